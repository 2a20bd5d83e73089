use std::sync::Arc;

use tracing::info;

use crate::credentials::BasicCredentials;
use crate::error::AuthError;
use crate::password::PasswordHasher;
use crate::user::{Registration, User, UserDirectory};

/// Verifies Basic credentials and registers new users.
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn UserDirectory>,
    hasher: PasswordHasher,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserDirectory>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    /// Authenticate from the raw `Authorization` header value.
    pub async fn authenticate(&self, header: Option<&str>) -> Result<User, AuthError> {
        let header = header.ok_or(AuthError::MissingCredentials)?;
        let creds = BasicCredentials::parse(header)?;

        let user = self
            .users
            .find(&creds.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if self.hasher.verify(&creds.password, &user.password_hash).await? {
            Ok(user)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    pub async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        let (username, password) = registration.validate()?;
        if self.users.find(&username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let hash = self.hasher.hash(&password).await?;
        // The directory re-checks uniqueness on insert (concurrent registrations).
        let user = self
            .users
            .insert(&username, &hash)
            .await?
            .ok_or(AuthError::UsernameTaken)?;
        info!(username = %user.username, user_id = %user.id, "user registered");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::{PASSWORD_REQUIRED, USERNAME_REQUIRED};
    use async_trait::async_trait;
    use sparetrack_core::UserId;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Users(Mutex<Vec<User>>);

    #[async_trait]
    impl UserDirectory for Users {
        async fn find(&self, username: &str) -> Result<Option<User>, AuthError> {
            let users = self.0.lock().unwrap();
            Ok(users.iter().find(|u| u.username == username).cloned())
        }

        async fn insert(&self, username: &str, hash: &str) -> Result<Option<User>, AuthError> {
            let mut users = self.0.lock().unwrap();
            if users.iter().any(|u| u.username == username) {
                return Ok(None);
            }
            let user = User {
                id: UserId::new(users.len() as i64 + 1),
                username: username.to_string(),
                password_hash: hash.to_string(),
            };
            users.push(user.clone());
            Ok(Some(user))
        }
    }

    fn authenticator() -> Authenticator {
        Authenticator::new(Arc::new(Users::default()), PasswordHasher::with_cost(4))
    }

    fn registration(username: &str, password: &str) -> Registration {
        Registration {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn header(username: &str, password: &str) -> String {
        BasicCredentials {
            username: username.to_string(),
            password: password.to_string(),
        }
        .encode()
    }

    #[tokio::test]
    async fn registered_user_can_authenticate() {
        let auth = authenticator();
        let user = auth.register(registration("alice", "pw")).await.unwrap();
        assert_ne!(user.password_hash, "pw");

        let found = auth.authenticate(Some(&header("alice", "pw"))).await.unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let auth = authenticator();
        auth.register(registration("alice", "pw")).await.unwrap();

        let wrong = auth.authenticate(Some(&header("alice", "nope"))).await;
        let unknown = auth.authenticate(Some(&header("mallory", "pw"))).await;
        assert_eq!(wrong.unwrap_err(), AuthError::InvalidCredentials);
        assert_eq!(unknown.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn authentication_does_not_stall_other_tasks() {
        let auth = Authenticator::new(Arc::new(Users::default()), PasswordHasher::default());
        auth.register(registration("svc", "secret")).await.unwrap();

        let started = std::time::Instant::now();
        let sleeper = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            started.elapsed()
        });

        auth.authenticate(Some("Basic c3ZjOnNlY3JldA==")).await.unwrap();
        let waited = sleeper.await.unwrap();
        assert!(
            waited < std::time::Duration::from_millis(50),
            "sleeper waited {waited:?}"
        );
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let err = authenticator().authenticate(None).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let auth = authenticator();
        auth.register(registration("alice", "pw")).await.unwrap();
        let err = auth.register(registration("alice", "other")).await.unwrap_err();
        assert_eq!(err, AuthError::UsernameTaken);
    }

    #[tokio::test]
    async fn blank_registration_lists_both_fields() {
        let err = authenticator().register(registration(" ", "")).await.unwrap_err();
        assert_eq!(
            err,
            AuthError::Validation(vec![
                USERNAME_REQUIRED.to_string(),
                PASSWORD_REQUIRED.to_string()
            ])
        );
    }
}
