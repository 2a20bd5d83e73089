use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use sparetrack_core::{CategoryId, PartId, SupplierId};

use crate::client::PeerClient;
use crate::error::PeerError;
use crate::views::{CategoryView, PartView, SupplierView};

/// Lookup of records owned by another service.
#[async_trait]
pub trait Directory<I, V>: Send + Sync
where
    I: Copy + Into<i64> + Send + Sync + 'static,
    V: Send + 'static,
{
    /// Fetch a record; `PeerError::NotFound` when the owner answers 404.
    async fn get(&self, id: I) -> Result<V, PeerError>;

    async fn exists(&self, id: I) -> Result<bool, PeerError> {
        match self.get(id).await {
            Ok(_) => Ok(true),
            Err(PeerError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

pub type CategoryDirectory = dyn Directory<CategoryId, CategoryView>;
pub type SupplierDirectory = dyn Directory<SupplierId, SupplierView>;
pub type PartDirectory = dyn Directory<PartId, PartView>;

/// `Directory` backed by the owner's `GET {collection}/{id}` endpoint.
pub struct HttpDirectory<I, V> {
    client: PeerClient,
    resource: &'static str,
    collection: &'static str,
    _marker: PhantomData<fn(I) -> V>,
}

impl<I, V> HttpDirectory<I, V> {
    pub fn new(client: PeerClient, resource: &'static str, collection: &'static str) -> Self {
        Self {
            client,
            resource,
            collection,
            _marker: PhantomData,
        }
    }
}

impl HttpDirectory<CategoryId, CategoryView> {
    pub fn categories(client: PeerClient) -> Self {
        Self::new(client, "Category", "/api/categories")
    }
}

impl HttpDirectory<SupplierId, SupplierView> {
    pub fn suppliers(client: PeerClient) -> Self {
        Self::new(client, "Supplier", "/api/suppliers")
    }
}

impl HttpDirectory<PartId, PartView> {
    pub fn parts(client: PeerClient) -> Self {
        Self::new(client, "Part", "/api/parts")
    }
}

#[async_trait]
impl<I, V> Directory<I, V> for HttpDirectory<I, V>
where
    I: Copy + Into<i64> + Send + Sync + 'static,
    V: DeserializeOwned + Send + 'static,
{
    async fn get(&self, id: I) -> Result<V, PeerError> {
        let id: i64 = id.into();
        let path = format!("{}/{}", self.collection, id);
        let response = self.client.get(&path).await?;

        match response.status() {
            status if status.is_success() => self.client.decode(response).await,
            StatusCode::NOT_FOUND => Err(PeerError::NotFound {
                resource: self.resource,
                id,
            }),
            status => Err(self.client.unexpected(&path, status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PeerOptions;
    use axum::extract::Path;
    use axum::http::StatusCode as AxumStatus;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::time::Duration;

    struct Stub {
        base_url: String,
        handle: tokio::task::JoinHandle<()>,
    }

    impl Stub {
        async fn spawn(app: Router) -> Self {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base_url = format!("http://{}", listener.local_addr().unwrap());
            let handle = tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            Self { base_url, handle }
        }
    }

    impl Drop for Stub {
        fn drop(&mut self) {
            self.handle.abort();
        }
    }

    async fn category(Path(id): Path<i64>) -> impl IntoResponse {
        match id {
            1 => Json(json!({"id": 1, "name": "Filters", "description": null})).into_response(),
            2 => AxumStatus::INTERNAL_SERVER_ERROR.into_response(),
            3 => (AxumStatus::OK, "not json").into_response(),
            _ => AxumStatus::NOT_FOUND.into_response(),
        }
    }

    async fn directory() -> (Stub, HttpDirectory<CategoryId, CategoryView>) {
        let stub = Stub::spawn(Router::new().route("/api/categories/:id", get(category))).await;
        let client = PeerClient::new("category-service", &stub.base_url, &PeerOptions::default())
            .unwrap();
        (stub, HttpDirectory::categories(client))
    }

    #[tokio::test]
    async fn found_record_is_decoded() {
        let (_stub, dir) = directory().await;
        let view = dir.get(CategoryId::new(1)).await.unwrap();
        assert_eq!(view.name, "Filters");
        assert!(dir.exists(CategoryId::new(1)).await.unwrap());
    }

    #[tokio::test]
    async fn not_found_is_distinct_from_upstream() {
        let (_stub, dir) = directory().await;
        assert_eq!(
            dir.get(CategoryId::new(7)).await.unwrap_err(),
            PeerError::NotFound {
                resource: "Category",
                id: 7
            }
        );
        assert!(!dir.exists(CategoryId::new(7)).await.unwrap());
    }

    #[tokio::test]
    async fn server_error_and_bad_body_are_upstream() {
        let (_stub, dir) = directory().await;
        for id in [2, 3] {
            let err = dir.exists(CategoryId::new(id)).await.unwrap_err();
            assert!(matches!(err, PeerError::Upstream { service: "category-service", .. }));
        }
    }

    #[tokio::test]
    async fn unreachable_peer_is_upstream() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let options = PeerOptions {
            timeout: Duration::from_millis(500),
            credentials: None,
        };
        let client = PeerClient::new("category-service", base_url, &options).unwrap();
        let dir = HttpDirectory::categories(client);
        let err = dir.exists(CategoryId::new(1)).await.unwrap_err();
        assert!(!err.is_not_found());
    }
}
