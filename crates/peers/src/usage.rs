use async_trait::async_trait;

use sparetrack_core::{CategoryId, SupplierId};

use crate::client::PeerClient;
use crate::error::PeerError;

/// Asks the part service whether any part still points at a category or
/// supplier. Consulted before those are deleted.
#[async_trait]
pub trait PartUsage: Send + Sync {
    async fn references_category(&self, id: CategoryId) -> Result<bool, PeerError>;
    async fn references_supplier(&self, id: SupplierId) -> Result<bool, PeerError>;
}

pub struct HttpPartUsage {
    client: PeerClient,
}

impl HttpPartUsage {
    pub fn new(client: PeerClient) -> Self {
        Self { client }
    }

    async fn ask(&self, path: String) -> Result<bool, PeerError> {
        let response = self.client.get(&path).await?;
        if !response.status().is_success() {
            return Err(self.client.unexpected(&path, response.status()));
        }
        self.client.decode(response).await
    }
}

#[async_trait]
impl PartUsage for HttpPartUsage {
    async fn references_category(&self, id: CategoryId) -> Result<bool, PeerError> {
        self.ask(format!("/api/parts/exists-by-category/{id}")).await
    }

    async fn references_supplier(&self, id: SupplierId) -> Result<bool, PeerError> {
        self.ask(format!("/api/parts/exists-by-supplier/{id}")).await
    }
}
