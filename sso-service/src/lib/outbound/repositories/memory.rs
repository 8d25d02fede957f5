use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::Email;
use crate::domain::auth::models::PasswordHash;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AppProvider;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

#[derive(Default)]
struct Users {
    by_id: HashMap<UserId, User>,
    /// email -> user id, the uniqueness index
    by_email: HashMap<Email, UserId>,
    next_id: i64,
}

/// In-process credential store.
///
/// Same contract as the PostgreSQL store. Inserts check and claim the email
/// under a single write lock, so concurrent registrations of one email leave
/// exactly one winner.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    users: Arc<RwLock<Users>>,
    apps: Arc<RwLock<HashMap<AppId, App>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a relying application, replacing any with the same id.
    pub async fn insert_app(&self, app: App) {
        self.apps.write().await.insert(app.id, app);
    }

    /// Set the admin flag of an existing user.
    ///
    /// # Returns
    /// False if the user does not exist
    pub async fn grant_admin(&self, user_id: UserId) -> bool {
        match self.users.write().await.by_id.get_mut(&user_id) {
            Some(user) => {
                user.is_admin = true;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserSaver for InMemoryStore {
    async fn save_user(
        &self,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> Result<UserId, StorageError> {
        let mut users = self.users.write().await;

        if users.by_email.contains_key(email) {
            return Err(StorageError::UniqueViolation(email.to_string()));
        }

        users.next_id += 1;
        let id = UserId::new(users.next_id).map_err(|e| StorageError::Database(e.to_string()))?;

        users.by_email.insert(email.clone(), id);
        users.by_id.insert(
            id,
            User {
                id,
                email: email.clone(),
                password_hash: password_hash.clone(),
                is_admin: false,
            },
        );

        Ok(id)
    }
}

#[async_trait]
impl UserProvider for InMemoryStore {
    async fn user_by_email(&self, email: &Email) -> Result<Option<User>, StorageError> {
        let users = self.users.read().await;

        Ok(users
            .by_email
            .get(email)
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn is_admin(&self, user_id: UserId) -> Result<Option<bool>, StorageError> {
        Ok(self
            .users
            .read()
            .await
            .by_id
            .get(&user_id)
            .map(|user| user.is_admin))
    }
}

#[async_trait]
impl AppProvider for InMemoryStore {
    async fn app_by_id(&self, app_id: AppId) -> Result<Option<App>, StorageError> {
        Ok(self.apps.read().await.get(&app_id).cloned())
    }
}
