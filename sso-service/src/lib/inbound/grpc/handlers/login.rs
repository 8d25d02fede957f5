use std::sync::Arc;

use tonic::Status;

use crate::domain::auth::models::AppId;
use crate::domain::auth::models::Email;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::Password;
use crate::domain::auth::ports::AuthServicePort;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;

pub async fn login<S: AuthServicePort>(
    service: Arc<S>,
    request: LoginRequest,
) -> Result<LoginResponse, Status> {
    let command = try_into_command(request)?;
    let token = service.login(command).await?;

    Ok(LoginResponse { token })
}

fn try_into_command(request: LoginRequest) -> Result<LoginCommand, Status> {
    let email = Email::new(request.email)?;
    let password = Password::new(request.password)?;
    let app_id = AppId::new(request.app_id)?;

    Ok(LoginCommand::new(email, password, app_id))
}
