use thiserror::Error;

/// Outcome of a failed cross-service call.
///
/// Only an explicit 404 from the owning service is `NotFound`; timeouts,
/// refused connections, unexpected statuses and undecodable bodies all
/// collapse into `Upstream`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PeerError {
    #[error("{resource} with id {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("{service} call failed: {message}")]
    Upstream { service: &'static str, message: String },
}

impl PeerError {
    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PeerError::NotFound { .. })
    }
}
