use std::fmt;

use crate::domain::auth::errors::AppIdError;
use crate::domain::auth::errors::EmailError;
use crate::domain::auth::errors::PasswordError;
use crate::domain::auth::errors::UserIdError;

/// Registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub is_admin: bool,
}

/// Relying application, provisioned out of band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub id: AppId,
    pub name: String,
    pub secret: AppSecret,
}

/// User identifier assigned by the credential store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a user identifier.
    ///
    /// # Errors
    /// * `NotPositive` - Zero or negative identifier
    pub fn new(id: i64) -> Result<Self, UserIdError> {
        if id > 0 {
            Ok(Self(id))
        } else {
            Err(UserIdError::NotPositive(id))
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Application identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppId(i32);

impl AppId {
    /// Wrap an application identifier.
    ///
    /// # Errors
    /// * `NotPositive` - Zero or negative identifier
    pub fn new(id: i32) -> Result<Self, AppIdError> {
        if id > 0 {
            Ok(Self(id))
        } else {
            Err(AppIdError::NotPositive(id))
        }
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address, compared exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// # Errors
    /// * `Empty` - Email is the empty string
    pub fn new(email: String) -> Result<Self, EmailError> {
        if email.is_empty() {
            Err(EmailError::Empty)
        } else {
            Ok(Self(email))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password as received from a caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// # Errors
    /// * `Empty` - Password is the empty string
    pub fn new(password: String) -> Result<Self, PasswordError> {
        if password.is_empty() {
            Err(PasswordError::Empty)
        } else {
            Ok(Self(password))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Stored password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

/// Per-application token signing secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AppSecret(String);

impl AppSecret {
    pub fn new(secret: String) -> Self {
        Self(secret)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppSecret(***)")
    }
}

/// Command to authenticate a user for an application
#[derive(Debug)]
pub struct LoginCommand {
    pub email: Email,
    pub password: Password,
    pub app_id: AppId,
}

impl LoginCommand {
    pub fn new(email: Email, password: Password, app_id: AppId) -> Self {
        Self {
            email,
            password,
            app_id,
        }
    }
}

/// Command to register a new account
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: Email,
    pub password: Password,
}

impl RegisterCommand {
    pub fn new(email: Email, password: Password) -> Self {
        Self { email, password }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_must_be_positive() {
        assert!(UserId::new(1).is_ok());
        assert_eq!(UserId::new(0), Err(UserIdError::NotPositive(0)));
        assert_eq!(UserId::new(-3), Err(UserIdError::NotPositive(-3)));

        assert!(AppId::new(1).is_ok());
        assert_eq!(AppId::new(0), Err(AppIdError::NotPositive(0)));
    }

    #[test]
    fn test_empty_fields_rejected() {
        assert_eq!(Email::new(String::new()), Err(EmailError::Empty));
        assert!(Password::new(String::new()).is_err());
        assert_eq!(EmailError::Empty.to_string(), "no email provided");
        assert_eq!(PasswordError::Empty.to_string(), "no password provided");
    }

    #[test]
    fn test_email_is_case_sensitive() {
        let lower = Email::new("a@x.com".to_string()).unwrap();
        let upper = Email::new("A@x.com".to_string()).unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_sensitive_values_are_redacted() {
        let password = Password::new("Pwd1!".to_string()).unwrap();
        let secret = AppSecret::new("super-secret".to_string());
        let hash = PasswordHash::new("$argon2id$v=19$m=1024,t=1,p=1$abc$def".to_string());

        assert!(!format!("{:?}", password).contains("Pwd1!"));
        assert!(!format!("{:?}", secret).contains("super-secret"));
        assert!(!format!("{:?}", hash).contains("argon2id"));
    }
}
