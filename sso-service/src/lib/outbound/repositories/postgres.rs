use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::AppSecret;
use crate::domain::auth::models::Email;
use crate::domain::auth::models::PasswordHash;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AppProvider;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

/// Credential store backed by PostgreSQL.
///
/// Implements all three store ports over one pool; email uniqueness comes from
/// the `users.email` unique constraint.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    pass_hash: String,
    is_admin: bool,
}

impl TryFrom<UserRow> for User {
    type Error = StorageError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::new(row.id).map_err(|e| StorageError::Database(e.to_string()))?,
            email: Email::new(row.email).map_err(|e| StorageError::Database(e.to_string()))?,
            password_hash: PasswordHash::new(row.pass_hash),
            is_admin: row.is_admin,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AppRow {
    id: i32,
    name: String,
    secret: String,
}

impl TryFrom<AppRow> for App {
    type Error = StorageError;

    fn try_from(row: AppRow) -> Result<Self, Self::Error> {
        Ok(App {
            id: AppId::new(row.id).map_err(|e| StorageError::Database(e.to_string()))?,
            name: row.name,
            secret: AppSecret::new(row.secret),
        })
    }
}

fn database_error(e: sqlx::Error) -> StorageError {
    StorageError::Database(e.to_string())
}

#[async_trait]
impl UserSaver for PostgresStore {
    async fn save_user(
        &self,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> Result<UserId, StorageError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, pass_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(email.as_str())
        .bind(password_hash.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return StorageError::UniqueViolation(email.to_string());
                }
            }
            database_error(e)
        })?;

        UserId::new(id).map_err(|e| StorageError::Database(e.to_string()))
    }
}

#[async_trait]
impl UserProvider for PostgresStore {
    async fn user_by_email(&self, email: &Email) -> Result<Option<User>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, pass_hash, is_admin
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(User::try_from).transpose()
    }

    async fn is_admin(&self, user_id: UserId) -> Result<Option<bool>, StorageError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT is_admin
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)
    }
}

#[async_trait]
impl AppProvider for PostgresStore {
    async fn app_by_id(&self, app_id: AppId) -> Result<Option<App>, StorageError> {
        let row = sqlx::query_as::<_, AppRow>(
            r#"
            SELECT id, name, secret
            FROM apps
            WHERE id = $1
            "#,
        )
        .bind(app_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(App::try_from).transpose()
    }
}
