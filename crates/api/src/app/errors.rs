use axum::extract::rejection::JsonRejection;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use sparetrack_auth::AuthError;
use sparetrack_core::DomainError;
use sparetrack_infra::StoreError;
use sparetrack_peers::PeerError;

/// Application-level failure, translated into an HTTP response at the edge.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A foreign reference in the payload does not resolve at its owner.
    #[error("{reference} with id {id} not found")]
    ReferenceNotFound { reference: &'static str, id: i64 },

    #[error("{entity} with id {id} is still referenced by parts")]
    StillReferenced { entity: &'static str, id: i64 },

    #[error("upstream validation error: {0}")]
    Upstream(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl Into<i64>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err.messages())
    }
}

impl From<PeerError> for ServiceError {
    fn from(err: PeerError) -> Self {
        match err {
            PeerError::NotFound { resource, id } => Self::ReferenceNotFound {
                reference: resource,
                id,
            },
            PeerError::Upstream { .. } => Self::Upstream(err.to_string()),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ServiceError::Validation(messages) => validation_error(messages),
            ServiceError::NotFound { .. } | ServiceError::ReferenceNotFound { .. } => {
                json_error(StatusCode::NOT_FOUND, "not_found", message)
            }
            ServiceError::StillReferenced { .. } => {
                json_error(StatusCode::CONFLICT, "still_referenced", message)
            }
            ServiceError::Upstream(_) => json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "upstream_validation_error",
                message,
            ),
            ServiceError::Store(StoreError::Conflict { .. }) => {
                json_error(StatusCode::CONFLICT, "conflict", message)
            }
            ServiceError::Store(e) => {
                error!(error = %e, "store failure");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", message)
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// 400 with one message per violated rule.
pub fn validation_error(messages: Vec<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "validation_error",
            "messages": messages,
        })),
    )
        .into_response()
}

/// Responses for the authentication boundary and for registration.
pub fn auth_error(err: AuthError) -> Response {
    let message = err.to_string();
    match err {
        AuthError::Validation(messages) => validation_error(messages),
        AuthError::UsernameTaken => json_error(StatusCode::CONFLICT, "conflict", message),
        e if e.is_unauthorized() => {
            let mut response = json_error(StatusCode::UNAUTHORIZED, "unauthorized", message);
            response.headers_mut().insert(
                WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"sparetrack\""),
            );
            response
        }
        e => {
            error!(error = %e, "authentication backend failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "auth_error", message)
        }
    }
}

/// Unwrap a JSON body, turning a malformed payload into a validation error.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ServiceError::Validation(vec![rejection.body_text()]))
}
