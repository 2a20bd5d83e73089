use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::GatewayError;
use crate::merge::{merge, ServiceDoc};

/// A service whose API description is aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceEndpoint {
    pub name: String,
    pub url: String,
}

impl ServiceEndpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Where service documents come from.
#[async_trait]
pub trait DocSource: Send + Sync {
    async fn fetch(&self, service: &ServiceEndpoint) -> Result<Value, GatewayError>;
}

/// Fetches `<url><docs_path>` over HTTP.
pub struct HttpDocSource {
    http: reqwest::Client,
    docs_path: String,
}

impl HttpDocSource {
    pub fn new(docs_path: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            docs_path: docs_path.into(),
        })
    }
}

#[async_trait]
impl DocSource for HttpDocSource {
    async fn fetch(&self, service: &ServiceEndpoint) -> Result<Value, GatewayError> {
        let url = format!("{}{}", service.url.trim_end_matches('/'), self.docs_path);
        debug!(service = %service.name, %url, "fetching api description");

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Status(response.status().as_u16()));
        }

        let doc: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        if doc.is_object() {
            Ok(doc)
        } else {
            Err(GatewayError::NotAnObject)
        }
    }
}

/// Fetches every configured service concurrently and merges the results.
#[derive(Clone)]
pub struct Aggregator {
    source: Arc<dyn DocSource>,
    services: Vec<ServiceEndpoint>,
}

impl Aggregator {
    pub fn new(source: Arc<dyn DocSource>, services: Vec<ServiceEndpoint>) -> Self {
        Self { source, services }
    }

    pub fn services(&self) -> &[ServiceEndpoint] {
        &self.services
    }

    /// Never fails: a service that cannot be fetched contributes an empty
    /// document and a warning.
    pub async fn aggregate(&self) -> Value {
        let fetches = self.services.iter().map(|service| async move {
            let doc = match self.source.fetch(service).await {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(service = %service.name, url = %service.url, error = %e, "api description unavailable");
                    Value::Object(Map::new())
                }
            };
            ServiceDoc::new(service.name.clone(), doc)
        });

        merge(join_all(fetches).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    struct Fixed;

    #[async_trait]
    impl DocSource for Fixed {
        async fn fetch(&self, service: &ServiceEndpoint) -> Result<Value, GatewayError> {
            match service.name.as_str() {
                "broken" => Err(GatewayError::Status(503)),
                name => Ok(json!({
                    "paths": {"/api/things": {}},
                    "components": {"schemas": {"Thing": {"type": "object"}}},
                    "x-origin": name
                })),
            }
        }
    }

    #[tokio::test]
    async fn one_failure_does_not_fail_the_aggregate() {
        let aggregator = Aggregator::new(
            Arc::new(Fixed),
            vec![
                ServiceEndpoint::new("alpha", "http://alpha"),
                ServiceEndpoint::new("broken", "http://broken"),
                ServiceEndpoint::new("gamma", "http://gamma"),
            ],
        );

        let merged = aggregator.aggregate().await;
        let paths: Vec<_> = merged["paths"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(paths, vec!["/alpha/api/things", "/gamma/api/things"]);
        let schemas: Vec<_> = merged["components"]["schemas"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(schemas, vec!["alpha_Thing", "gamma_Thing"]);
    }

    #[tokio::test]
    async fn http_source_reads_documents_and_reports_failures() {
        let app = Router::new()
            .route(
                "/ok/v3/api-docs",
                get(|| async { Json(json!({"paths": {"/api/x": {}}})) }),
            )
            .route("/down/v3/api-docs", get(|| async { StatusCode::BAD_GATEWAY }))
            .route("/array/v3/api-docs", get(|| async { Json(json!([1, 2])) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let source = HttpDocSource::new("/v3/api-docs", Duration::from_secs(2)).unwrap();
        let ok = source
            .fetch(&ServiceEndpoint::new("ok", format!("{base}/ok")))
            .await
            .unwrap();
        assert!(ok["paths"]["/api/x"].is_object());

        let down = source
            .fetch(&ServiceEndpoint::new("down", format!("{base}/down/")))
            .await;
        assert_eq!(down, Err(GatewayError::Status(502)));

        let array = source
            .fetch(&ServiceEndpoint::new("array", format!("{base}/array")))
            .await;
        assert_eq!(array, Err(GatewayError::NotAnObject));

        handle.abort();
    }
}
