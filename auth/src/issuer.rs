use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SessionClaims;

/// Session token issuer.
///
/// Holds the token time-to-live fixed for the lifetime of the service. The
/// signing key is supplied on every call: each relying application signs with
/// its own secret.
#[derive(Debug, Clone, Copy)]
pub struct TokenIssuer {
    ttl: Duration,
}

/// A signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: SessionClaims,
}

impl TokenIssuer {
    /// Create an issuer whose tokens expire `ttl` after issuance.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Issue a token for a user and application, valid from now.
    ///
    /// # Errors
    /// * `EmptySecret` - Application secret is empty
    /// * `ExpiryOutOfRange` - TTL pushes expiry past the representable range
    /// * `EncodingFailed` - Token signing failed
    pub fn issue(
        &self,
        user_id: i64,
        email: &str,
        app_id: i32,
        app_secret: &[u8],
    ) -> Result<IssuedToken, JwtError> {
        self.issue_at(user_id, email, app_id, app_secret, Utc::now())
    }

    /// Issue a token as if issued at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: i64,
        email: &str,
        app_id: i32,
        app_secret: &[u8],
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let handler = JwtHandler::new(app_secret)?;
        let claims = SessionClaims::new(user_id, email, app_id, issued_at, self.ttl)?;
        let token = handler.encode(&claims)?;

        Ok(IssuedToken { token, claims })
    }
}
