use tonic::Status;

use crate::domain::auth::errors::AppIdError;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::EmailError;
use crate::domain::auth::errors::PasswordError;
use crate::domain::auth::errors::UserIdError;

pub mod is_admin;
pub mod login;
pub mod register;

impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidApplication => {
                Status::invalid_argument(err.to_string())
            }
            AuthError::UserExists => Status::already_exists(err.to_string()),
            AuthError::UserNotFound => Status::not_found(err.to_string()),
            AuthError::Internal(_) => Status::internal(err.to_string()),
        }
    }
}

impl From<EmailError> for Status {
    fn from(err: EmailError) -> Self {
        Status::invalid_argument(err.to_string())
    }
}

impl From<PasswordError> for Status {
    fn from(err: PasswordError) -> Self {
        Status::invalid_argument(err.to_string())
    }
}

impl From<AppIdError> for Status {
    fn from(err: AppIdError) -> Self {
        Status::invalid_argument(err.to_string())
    }
}

impl From<UserIdError> for Status {
    fn from(err: UserIdError) -> Self {
        Status::invalid_argument(err.to_string())
    }
}
