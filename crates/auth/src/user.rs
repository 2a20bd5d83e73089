use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sparetrack_core::{is_present, UserId, Violations};

use crate::error::AuthError;

pub const USERNAME_REQUIRED: &str = "Username must not be empty";
pub const PASSWORD_REQUIRED: &str = "Password must not be empty";

/// A registered account. Only the bcrypt hash is ever stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
}

/// `POST /register` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registration {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Registration {
    /// Returns `(username, password)` once both are present.
    pub fn validate(self) -> Result<(String, String), AuthError> {
        let mut violations = Violations::new();
        violations.check(is_present(self.username.as_deref()), USERNAME_REQUIRED);
        violations.check(is_present(self.password.as_deref()), PASSWORD_REQUIRED);

        match (self.username, self.password) {
            (Some(username), Some(password)) if violations.is_empty() => {
                Ok((username.trim().to_string(), password))
            }
            _ => Err(AuthError::Validation(violations.into_messages())),
        }
    }
}

/// Storage of user accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find(&self, username: &str) -> Result<Option<User>, AuthError>;

    /// Insert a new account; `Ok(None)` when the username is already taken.
    async fn insert(&self, username: &str, password_hash: &str) -> Result<Option<User>, AuthError>;
}
