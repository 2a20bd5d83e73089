use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, Json};
use utoipa::openapi::OpenApi;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn api_docs(Extension(doc): Extension<Arc<OpenApi>>) -> Json<OpenApi> {
    Json(doc.as_ref().clone())
}
