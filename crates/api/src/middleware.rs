use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use sparetrack_auth::Authenticator;

use crate::app::errors;

/// Basic authentication for paths under the configured prefixes.
#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<Authenticator>,
    pub protected_prefixes: Arc<Vec<String>>,
}

impl AuthState {
    pub fn new(authenticator: Arc<Authenticator>, protected_prefixes: Vec<String>) -> Self {
        Self {
            authenticator,
            protected_prefixes: Arc::new(protected_prefixes),
        }
    }

    /// `/api` protects `/api` and `/api/...` but not `/apix`.
    pub fn protects(&self, path: &str) -> bool {
        self.protected_prefixes.iter().any(|prefix| {
            let prefix = prefix.trim_end_matches('/');
            path == prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

pub async fn basic_auth_middleware(
    State(state): State<AuthState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    if !state.protects(req.uri().path()) {
        return next.run(req).await;
    }

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    match state.authenticator.authenticate(header.as_deref()).await {
        Ok(user) => {
            debug!(username = %user.username, path = %req.uri().path(), "authenticated");
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(e) => {
            debug!(path = %req.uri().path(), error = %e, "authentication rejected");
            errors::auth_error(e)
        }
    }
}
