use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenIssuer;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::Password;
use crate::domain::auth::models::PasswordHash;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AppProvider;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

/// Domain service implementation for credential operations.
///
/// Stateless between calls: every request reads from the stores, computes its
/// own hash on the blocking pool and signs its own token.
pub struct AuthService<US, UP, AP>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
{
    user_saver: Arc<US>,
    user_provider: Arc<UP>,
    app_provider: Arc<AP>,
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
}

impl<US, UP, AP> AuthService<US, UP, AP>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `user_saver` - Account persistence
    /// * `user_provider` - Account lookups
    /// * `app_provider` - Relying application lookups
    /// * `password_hasher` - Hasher carrying the configured cost
    /// * `token_issuer` - Issuer carrying the configured token time-to-live
    pub fn new(
        user_saver: Arc<US>,
        user_provider: Arc<UP>,
        app_provider: Arc<AP>,
        password_hasher: PasswordHasher,
        token_issuer: TokenIssuer,
    ) -> Self {
        Self {
            user_saver,
            user_provider,
            app_provider,
            password_hasher,
            token_issuer,
        }
    }

    async fn hash_password(&self, password: Password) -> Result<PasswordHash, AuthError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
            .map(PasswordHash::new)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Malformed stored hashes count as a mismatch.
    async fn verify_password(
        &self,
        password: Password,
        hash: PasswordHash,
    ) -> Result<bool, AuthError> {
        let hasher = self.password_hasher.clone();

        let outcome =
            tokio::task::spawn_blocking(move || hasher.verify(password.expose(), hash.as_str()))
                .await
                .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))?;

        match outcome {
            Ok(matches) => Ok(matches),
            Err(e) => {
                tracing::error!(error = %e, "Stored password hash is unusable");
                Ok(false)
            }
        }
    }
}

fn internal(context: &str, err: StorageError) -> AuthError {
    tracing::error!(error = %err, "{}", context);
    AuthError::from(err)
}

#[async_trait]
impl<US, UP, AP> AuthServicePort for AuthService<US, UP, AP>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
{
    async fn login(&self, command: LoginCommand) -> Result<String, AuthError> {
        let LoginCommand {
            email,
            password,
            app_id,
        } = command;

        tracing::info!(email = %email, app_id = %app_id, "Logging in user");

        let user = self
            .user_provider
            .user_by_email(&email)
            .await
            .map_err(|e| internal("Failed to get user", e))?
            .ok_or_else(|| {
                tracing::warn!(email = %email, "User not found");
                AuthError::InvalidCredentials
            })?;

        if !self
            .verify_password(password, user.password_hash.clone())
            .await?
        {
            tracing::warn!(email = %email, user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let app = self
            .app_provider
            .app_by_id(app_id)
            .await
            .map_err(|e| internal("Failed to get app", e))?
            .ok_or_else(|| {
                tracing::warn!(email = %email, app_id = %app_id, "App not found");
                AuthError::InvalidApplication
            })?;

        let issued = self
            .token_issuer
            .issue(
                user.id.value(),
                user.email.as_str(),
                app.id.value(),
                app.secret.as_bytes(),
            )
            .map_err(|e| {
                tracing::error!(app_id = %app.id, error = %e, "Failed to create token");
                AuthError::Internal(e.to_string())
            })?;

        tracing::info!(
            user_id = %user.id,
            app_id = %app.id,
            expires_at = issued.claims.exp,
            "User logged in"
        );

        Ok(issued.token)
    }

    async fn register(&self, command: RegisterCommand) -> Result<UserId, AuthError> {
        let RegisterCommand { email, password } = command;

        tracing::info!(email = %email, "Registering new user");

        let password_hash = self.hash_password(password).await.map_err(|e| {
            tracing::error!(email = %email, error = ?e, "Failed to hash password");
            e
        })?;

        let user_id = self
            .user_saver
            .save_user(&email, &password_hash)
            .await
            .map_err(|e| match e {
                StorageError::UniqueViolation(_) => {
                    tracing::warn!(email = %email, "User already exists");
                    AuthError::UserExists
                }
                other => internal("Failed to save user", other),
            })?;

        tracing::info!(email = %email, user_id = %user_id, "User registered");

        Ok(user_id)
    }

    async fn is_admin(&self, user_id: UserId) -> Result<bool, AuthError> {
        tracing::info!(user_id = %user_id, "Checking if user is admin");

        let is_admin = self
            .user_provider
            .is_admin(user_id)
            .await
            .map_err(|e| internal("Failed to check admin flag", e))?
            .ok_or_else(|| {
                tracing::warn!(user_id = %user_id, "User not found");
                AuthError::UserNotFound
            })?;

        tracing::info!(user_id = %user_id, is_admin, "Checked if user is admin");

        Ok(is_admin)
    }
}

#[cfg(test)]
mod tests {
    use auth::HashingCost;
    use auth::JwtHandler;
    use auth::SessionClaims;
    use chrono::Duration;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::auth::models::App;
    use crate::domain::auth::models::AppId;
    use crate::domain::auth::models::AppSecret;
    use crate::domain::auth::models::Email;
    use crate::domain::auth::models::User;

    mock! {
        pub TestUserSaver {}

        #[async_trait]
        impl UserSaver for TestUserSaver {
            async fn save_user(&self, email: &Email, password_hash: &PasswordHash) -> Result<UserId, StorageError>;
        }
    }

    mock! {
        pub TestUserProvider {}

        #[async_trait]
        impl UserProvider for TestUserProvider {
            async fn user_by_email(&self, email: &Email) -> Result<Option<User>, StorageError>;
            async fn is_admin(&self, user_id: UserId) -> Result<Option<bool>, StorageError>;
        }
    }

    mock! {
        pub TestAppProvider {}

        #[async_trait]
        impl AppProvider for TestAppProvider {
            async fn app_by_id(&self, app_id: AppId) -> Result<Option<App>, StorageError>;
        }
    }

    const APP_SECRET: &str = "super-secret";
    const TTL_SECS: i64 = 3600;

    fn hasher() -> PasswordHasher {
        PasswordHasher::with_cost(HashingCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    fn service(
        user_saver: MockTestUserSaver,
        user_provider: MockTestUserProvider,
        app_provider: MockTestAppProvider,
    ) -> AuthService<MockTestUserSaver, MockTestUserProvider, MockTestAppProvider> {
        AuthService::new(
            Arc::new(user_saver),
            Arc::new(user_provider),
            Arc::new(app_provider),
            hasher(),
            TokenIssuer::new(Duration::seconds(TTL_SECS)),
        )
    }

    fn email(value: &str) -> Email {
        Email::new(value.to_string()).unwrap()
    }

    fn password(value: &str) -> Password {
        Password::new(value.to_string()).unwrap()
    }

    fn stored_user(id: i64, address: &str, plain: &str) -> User {
        User {
            id: UserId::new(id).unwrap(),
            email: email(address),
            password_hash: PasswordHash::new(hasher().hash(plain).unwrap()),
            is_admin: false,
        }
    }

    fn stored_app(id: i32, secret: &str) -> App {
        App {
            id: AppId::new(id).unwrap(),
            name: "test".to_string(),
            secret: AppSecret::new(secret.to_string()),
        }
    }

    fn login_command(address: &str, plain: &str, app_id: i32) -> LoginCommand {
        LoginCommand::new(email(address), password(plain), AppId::new(app_id).unwrap())
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut user_saver = MockTestUserSaver::new();

        user_saver
            .expect_save_user()
            .withf(|email, hash| {
                email.as_str() == "a@x.com" && hash.as_str().starts_with("$argon2id$")
            })
            .times(1)
            .returning(|_, _| Ok(UserId::new(1).unwrap()));

        let service = service(
            user_saver,
            MockTestUserProvider::new(),
            MockTestAppProvider::new(),
        );

        let result = service
            .register(RegisterCommand::new(email("a@x.com"), password("Pwd1!")))
            .await;

        assert_eq!(result, Ok(UserId::new(1).unwrap()));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut user_saver = MockTestUserSaver::new();

        user_saver
            .expect_save_user()
            .times(1)
            .returning(|email, _| Err(StorageError::UniqueViolation(email.to_string())));

        let service = service(
            user_saver,
            MockTestUserProvider::new(),
            MockTestAppProvider::new(),
        );

        let result = service
            .register(RegisterCommand::new(email("a@x.com"), password("Pwd1!")))
            .await;

        assert_eq!(result, Err(AuthError::UserExists));
    }

    #[tokio::test]
    async fn test_register_storage_failure_is_internal() {
        let mut user_saver = MockTestUserSaver::new();

        user_saver
            .expect_save_user()
            .times(1)
            .returning(|_, _| Err(StorageError::Database("connection reset".to_string())));

        let service = service(
            user_saver,
            MockTestUserProvider::new(),
            MockTestAppProvider::new(),
        );

        let err = service
            .register(RegisterCommand::new(email("a@x.com"), password("Pwd1!")))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Internal(_)));
        assert_eq!(err.to_string(), "internal error");
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut user_provider = MockTestUserProvider::new();
        let mut app_provider = MockTestAppProvider::new();

        let user = stored_user(1, "a@x.com", "Pwd1!");
        user_provider
            .expect_user_by_email()
            .withf(|email| email.as_str() == "a@x.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        app_provider
            .expect_app_by_id()
            .withf(|app_id| app_id.value() == 1)
            .times(1)
            .returning(|_| Ok(Some(stored_app(1, APP_SECRET))));

        let service = service(MockTestUserSaver::new(), user_provider, app_provider);

        let login_time = Utc::now().timestamp();
        let token = service
            .login(login_command("a@x.com", "Pwd1!", 1))
            .await
            .expect("Login failed");

        let claims: SessionClaims = JwtHandler::new(APP_SECRET.as_bytes())
            .unwrap()
            .decode(&token)
            .expect("Token validation failed");

        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.app_id, 1);
        assert!((claims.exp - (login_time + TTL_SECS)).abs() <= 1);
    }

    #[tokio::test]
    async fn test_login_unknown_email_and_wrong_password_are_indistinguishable() {
        let mut user_provider = MockTestUserProvider::new();
        let mut app_provider = MockTestAppProvider::new();

        let user = stored_user(1, "a@x.com", "Pwd1!");
        user_provider
            .expect_user_by_email()
            .returning(move |email| {
                if email.as_str() == "a@x.com" {
                    Ok(Some(user.clone()))
                } else {
                    Ok(None)
                }
            });

        // Never reached: credentials are checked first
        app_provider.expect_app_by_id().times(0);

        let service = service(MockTestUserSaver::new(), user_provider, app_provider);

        let unknown = service
            .login(login_command("nobody@x.com", "Pwd1!", 1))
            .await
            .unwrap_err();
        let wrong = service
            .login(login_command("a@x.com", "wrong", 1))
            .await
            .unwrap_err();

        assert_eq!(unknown, AuthError::InvalidCredentials);
        assert_eq!(wrong, AuthError::InvalidCredentials);
        assert_eq!(unknown, wrong);
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_login_malformed_hash_is_invalid_credentials() {
        let mut user_provider = MockTestUserProvider::new();

        user_provider.expect_user_by_email().returning(|email| {
            Ok(Some(User {
                id: UserId::new(1).unwrap(),
                email: email.clone(),
                password_hash: PasswordHash::new("not-a-phc-string".to_string()),
                is_admin: false,
            }))
        });

        let service = service(
            MockTestUserSaver::new(),
            user_provider,
            MockTestAppProvider::new(),
        );

        let result = service.login(login_command("a@x.com", "Pwd1!", 1)).await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_app() {
        let mut user_provider = MockTestUserProvider::new();
        let mut app_provider = MockTestAppProvider::new();

        let user = stored_user(1, "a@x.com", "Pwd1!");
        user_provider
            .expect_user_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        app_provider
            .expect_app_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(MockTestUserSaver::new(), user_provider, app_provider);

        let result = service.login(login_command("a@x.com", "Pwd1!", 42)).await;
        assert_eq!(result, Err(AuthError::InvalidApplication));
    }

    #[tokio::test]
    async fn test_login_storage_failure_is_internal() {
        let mut user_provider = MockTestUserProvider::new();

        user_provider
            .expect_user_by_email()
            .returning(|_| Err(StorageError::Database("pool timed out".to_string())));

        let service = service(
            MockTestUserSaver::new(),
            user_provider,
            MockTestAppProvider::new(),
        );

        let err = service
            .login(login_command("a@x.com", "Pwd1!", 1))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Internal(_)));
        assert!(!err.to_string().contains("pool timed out"));
    }

    #[tokio::test]
    async fn test_login_signing_failure_is_internal() {
        let mut user_provider = MockTestUserProvider::new();
        let mut app_provider = MockTestAppProvider::new();

        let user = stored_user(1, "a@x.com", "Pwd1!");
        user_provider
            .expect_user_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        app_provider
            .expect_app_by_id()
            .returning(|_| Ok(Some(stored_app(1, ""))));

        let service = service(MockTestUserSaver::new(), user_provider, app_provider);

        let result = service.login(login_command("a@x.com", "Pwd1!", 1)).await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[tokio::test]
    async fn test_login_expiry_overflow_is_internal() {
        let mut user_provider = MockTestUserProvider::new();
        let mut app_provider = MockTestAppProvider::new();

        let user = stored_user(1, "a@x.com", "Pwd1!");
        user_provider
            .expect_user_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        app_provider
            .expect_app_by_id()
            .returning(|_| Ok(Some(stored_app(1, APP_SECRET))));

        let service = AuthService::new(
            Arc::new(MockTestUserSaver::new()),
            Arc::new(user_provider),
            Arc::new(app_provider),
            hasher(),
            TokenIssuer::new(Duration::seconds(10_000_000_000_000)),
        );

        let result = tokio::spawn(async move {
            service.login(login_command("a@x.com", "Pwd1!", 1)).await
        })
        .await
        .expect("Login task panicked");

        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[tokio::test]
    async fn test_is_admin_returns_stored_flag() {
        let mut user_provider = MockTestUserProvider::new();

        user_provider
            .expect_is_admin()
            .returning(|user_id| Ok(Some(user_id.value() == 2)));

        let service = service(
            MockTestUserSaver::new(),
            user_provider,
            MockTestAppProvider::new(),
        );

        assert_eq!(service.is_admin(UserId::new(1).unwrap()).await, Ok(false));
        assert_eq!(service.is_admin(UserId::new(2).unwrap()).await, Ok(true));
    }

    #[tokio::test]
    async fn test_is_admin_unknown_user() {
        let mut user_provider = MockTestUserProvider::new();

        user_provider
            .expect_is_admin()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(
            MockTestUserSaver::new(),
            user_provider,
            MockTestAppProvider::new(),
        );

        let result = service.is_admin(UserId::new(99).unwrap()).await;
        assert_eq!(result, Err(AuthError::UserNotFound));
    }
}
