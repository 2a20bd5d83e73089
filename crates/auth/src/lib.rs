//! `sparetrack-auth`: HTTP Basic authentication boundary.
//!
//! This crate is decoupled from HTTP frameworks and storage: it parses the
//! `Authorization` header value, hashes and verifies passwords, and talks to
//! users through the `UserDirectory` trait.

pub mod authenticator;
pub mod credentials;
pub mod error;
pub mod password;
pub mod user;

pub use authenticator::Authenticator;
pub use credentials::BasicCredentials;
pub use error::AuthError;
pub use password::PasswordHasher;
pub use user::{Registration, User, UserDirectory};
