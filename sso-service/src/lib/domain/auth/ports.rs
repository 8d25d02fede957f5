use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::Email;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::PasswordHash;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;

/// Port for auth domain service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Authenticate a user and issue a session token for an application.
    ///
    /// # Returns
    /// Signed session token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Email unknown or password mismatch
    /// * `InvalidApplication` - Application does not exist
    /// * `Internal` - Storage, hashing or signing failed
    async fn login(&self, command: LoginCommand) -> Result<String, AuthError>;

    /// Register a new account.
    ///
    /// # Returns
    /// Identifier assigned to the new user
    ///
    /// # Errors
    /// * `UserExists` - Email is already registered
    /// * `Internal` - Storage or hashing failed
    async fn register(&self, command: RegisterCommand) -> Result<UserId, AuthError>;

    /// Check whether a user holds administrator privilege.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `Internal` - Storage failed
    async fn is_admin(&self, user_id: UserId) -> Result<bool, AuthError>;
}

/// Persists new accounts.
#[async_trait]
pub trait UserSaver: Send + Sync + 'static {
    /// Store a new user.
    ///
    /// Email uniqueness is enforced atomically by the store.
    ///
    /// # Errors
    /// * `UniqueViolation` - Email is already registered
    /// * `Database` - Storage operation failed
    async fn save_user(
        &self,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> Result<UserId, StorageError>;
}

/// Reads accounts.
#[async_trait]
pub trait UserProvider: Send + Sync + 'static {
    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn user_by_email(&self, email: &Email) -> Result<Option<User>, StorageError>;

    /// Retrieve the admin flag of a user.
    ///
    /// # Returns
    /// Optional flag (None if the user does not exist)
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn is_admin(&self, user_id: UserId) -> Result<Option<bool>, StorageError>;
}

/// Reads relying applications.
#[async_trait]
pub trait AppProvider: Send + Sync + 'static {
    /// Retrieve application by identifier.
    ///
    /// # Returns
    /// Optional application (None if not found)
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn app_by_id(&self, app_id: AppId) -> Result<Option<App>, StorageError>;
}
