use tokio::task;

use crate::error::AuthError;

/// bcrypt with a configurable work factor.
///
/// Hashing and verification run on tokio's blocking pool; at the default
/// cost one call takes hundreds of milliseconds of CPU.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_owned();
        let cost = self.cost;
        task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// `false` for a wrong password; `Err` only for an unreadable hash.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hasher = PasswordHasher::with_cost(4);
        let hash = hasher.hash("hunter2").await.unwrap();
        assert_ne!(hash, "hunter2");
        assert!(hasher.verify("hunter2", &hash).await.unwrap());
        assert!(!hasher.verify("hunter3", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_is_an_error() {
        let hasher = PasswordHasher::with_cost(4);
        assert!(hasher.verify("x", "not-a-bcrypt-hash").await.is_err());
    }

    #[tokio::test]
    async fn default_cost_work_leaves_the_runtime_free() {
        let hasher = PasswordHasher::default();
        let hash = hasher.hash("secret").await.unwrap();

        let started = Instant::now();
        let sleeper = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            started.elapsed()
        });

        assert!(hasher.verify("secret", &hash).await.unwrap());
        let waited = sleeper.await.unwrap();
        assert!(waited < Duration::from_millis(50), "sleeper waited {waited:?}");
    }
}
