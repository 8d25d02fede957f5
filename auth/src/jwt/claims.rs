use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::JwtError;

/// Claims carried by a session token.
///
/// Binds a user to the relying application that requested the token.
/// Timestamps are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject user identifier
    pub user_id: i64,

    /// Subject email as stored
    pub email: String,

    /// Application the token was issued for
    pub app_id: i32,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,
}

impl SessionClaims {
    /// Build claims issued at `issued_at` and valid for `ttl`.
    ///
    /// # Errors
    /// * `ExpiryOutOfRange` - `issued_at + ttl` is not a representable instant
    pub fn new(
        user_id: i64,
        email: impl Into<String>,
        app_id: i32,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(JwtError::ExpiryOutOfRange)?;

        Ok(Self {
            user_id,
            email: email.into(),
            app_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }
}
