use thiserror::Error;

/// Why one service's document could not be fetched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("undecodable document: {0}")]
    Decode(String),

    #[error("document is not a JSON object")]
    NotAnObject,
}
