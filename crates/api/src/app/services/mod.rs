//! Application services: one per domain service.
//!
//! Each write runs in the same order: field rules, existence of the target
//! record, cross-service reference checks (or uniqueness), then the store.
//! Checks and writes are separate calls, so a peer can change in between.

use tracing::warn;

use sparetrack_peers::{Directory, PeerError};

use crate::app::errors::ServiceError;

pub mod categories;
pub mod inventory;
pub mod parts;
pub mod suppliers;

pub use categories::CategoryService;
pub use inventory::InventoryService;
pub use parts::PartService;
pub use suppliers::SupplierService;

/// Confirm that `id` exists at its owning service before a write.
pub(crate) async fn require_reference<I, V>(
    directory: &dyn Directory<I, V>,
    reference: &'static str,
    id: I,
) -> Result<(), ServiceError>
where
    I: Copy + Into<i64> + Send + Sync + 'static,
    V: Send + 'static,
{
    match directory.exists(id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(ServiceError::ReferenceNotFound {
            reference,
            id: id.into(),
        }),
        Err(e) => {
            warn!(reference, id = id.into(), error = %e, "reference check failed");
            Err(ServiceError::Upstream(e.to_string()))
        }
    }
}

/// Read-side join: a failed lookup costs the sub-resource, not the record.
pub(crate) fn degrade<V>(what: &'static str, id: i64, lookup: Result<V, PeerError>) -> Option<V> {
    match lookup {
        Ok(view) => Some(view),
        Err(e) => {
            warn!(resource = what, id, error = %e, "enrichment lookup failed");
            None
        }
    }
}

/// Ask whether dependents exist before deleting a referenced record.
pub(crate) fn still_referenced(
    entity: &'static str,
    id: i64,
    answer: Result<bool, PeerError>,
) -> Result<(), ServiceError> {
    match answer {
        Ok(false) => Ok(()),
        Ok(true) => {
            tracing::info!(entity, id, "delete rejected: still referenced");
            Err(ServiceError::StillReferenced { entity, id })
        }
        Err(e) => {
            warn!(entity, id, error = %e, "dependent check failed");
            Err(ServiceError::Upstream(e.to_string()))
        }
    }
}
