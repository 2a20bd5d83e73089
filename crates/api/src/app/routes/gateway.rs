use std::sync::Arc;

use axum::{extract::Extension, routing::get, Json, Router};
use serde_json::Value;

use sparetrack_gateway::Aggregator;

pub fn router() -> Router {
    Router::new().route("/swagger", get(swagger))
}

/// Fetched fresh on every request; unreachable services contribute nothing.
#[utoipa::path(
    get,
    path = "/swagger",
    tag = "gateway",
    responses((status = 200, description = "Merged API description of every configured service"))
)]
pub async fn swagger(Extension(aggregator): Extension<Arc<Aggregator>>) -> Json<Value> {
    Json(aggregator.aggregate().await)
}
