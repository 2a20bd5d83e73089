//! User accounts for the auth service.

use std::sync::RwLock;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use sparetrack_auth::{AuthError, User, UserDirectory};
use sparetrack_core::UserId;

use crate::store::postgres::map_sqlx_error;
use crate::store::StoreError;

fn directory_error(err: StoreError) -> AuthError {
    AuthError::Directory(err.to_string())
}

#[derive(Default)]
pub struct InMemoryUsers {
    users: RwLock<Vec<User>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUsers {
    async fn find(&self, username: &str) -> Result<Option<User>, AuthError> {
        let users = self
            .users
            .read()
            .map_err(|_| directory_error(StoreError::Poisoned))?;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<Option<User>, AuthError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| directory_error(StoreError::Poisoned))?;
        if users.iter().any(|u| u.username == username) {
            return Ok(None);
        }

        let user = User {
            id: UserId::new(users.len() as i64 + 1),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.push(user.clone());
        Ok(Some(user))
    }
}

pub struct PgUsers {
    pool: PgPool,
}

impl PgUsers {
    pub const DDL: &'static str = r#"
        CREATE TABLE IF NOT EXISTS users (
            id            BIGSERIAL PRIMARY KEY,
            username      TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL
        )
    "#;

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(Self::DDL)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| map_sqlx_error("ensure_schema", e))
    }
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> Result<User, AuthError> {
    let decode = |e: sqlx::Error| directory_error(StoreError::Decode(e.to_string()));
    Ok(User {
        id: UserId::new(row.try_get("id").map_err(decode)?),
        username: row.try_get("username").map_err(decode)?,
        password_hash: row.try_get("password_hash").map_err(decode)?,
    })
}

#[async_trait]
impl UserDirectory for PgUsers {
    async fn find(&self, username: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query("SELECT id, username, password_hash FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| directory_error(map_sqlx_error("find_user", e)))?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username, password_hash
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| directory_error(map_sqlx_error("insert_user", e)))?;
        row.as_ref().map(user_from_row).transpose()
    }
}
