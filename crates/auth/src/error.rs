use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,

    #[error("malformed credentials")]
    MalformedCredentials,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("invalid registration: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("user directory failure: {0}")]
    Directory(String),
}

impl AuthError {
    /// Errors that mean "the caller is not who they claim to be".
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AuthError::MissingCredentials
                | AuthError::MalformedCredentials
                | AuthError::InvalidCredentials
        )
    }
}
