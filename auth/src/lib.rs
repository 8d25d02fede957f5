//! Credential primitives for the single-sign-on service
//!
//! - Password hashing (Argon2id, PHC strings, configurable cost)
//! - Session token claims and JWT encoding/decoding (HS256)
//! - Token issuance with per-application signing secrets
//!
//! Nothing here knows about users, applications or storage; the service adapts
//! these building blocks to its own domain types.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Issuing and verifying a session token
//! ```
//! use auth::{JwtHandler, SessionClaims, TokenIssuer};
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(Duration::hours(1));
//! let issued = issuer.issue(1, "a@x.com", 1, b"app-secret").unwrap();
//!
//! // A relying application holding the same secret verifies the token
//! let handler = JwtHandler::new(b"app-secret").unwrap();
//! let claims: SessionClaims = handler.decode(&issued.token).unwrap();
//! assert_eq!(claims.user_id, 1);
//! assert_eq!(claims.exp - claims.iat, 3600);
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use issuer::IssuedToken;
pub use issuer::TokenIssuer;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SessionClaims;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
