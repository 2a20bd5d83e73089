use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::debug;

use sparetrack_auth::Authenticator;

use crate::app::dto::{ErrorBody, RegisterRequest, ValidationErrorBody};
use crate::app::errors;

pub fn router() -> Router {
    Router::new().route("/register", post(register))
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = String),
        (status = 400, description = "Username or password blank", body = ValidationErrorBody),
        (status = 409, description = "Username already exists", body = ErrorBody)
    )
)]
pub async fn register(
    Extension(authenticator): Extension<Arc<Authenticator>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return errors::validation_error(vec![rejection.body_text()]),
    };

    match authenticator.register(request.into()).await {
        Ok(user) => {
            debug!(user_id = %user.id, "registration accepted");
            (StatusCode::OK, "User registered").into_response()
        }
        Err(e) => errors::auth_error(e),
    }
}
