use std::sync::Arc;

use tonic::Status;

use crate::domain::auth::models::Email;
use crate::domain::auth::models::Password;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;

pub async fn register<S: AuthServicePort>(
    service: Arc<S>,
    request: RegisterRequest,
) -> Result<RegisterResponse, Status> {
    let email = Email::new(request.email)?;
    let password = Password::new(request.password)?;

    let user_id = service
        .register(RegisterCommand::new(email, password))
        .await?;

    Ok(RegisterResponse {
        user_id: user_id.value(),
    })
}
