//! Entity Store: one table per service, keyed by a store-assigned id.
//!
//! `Table<R>` is the CRUD contract every service uses. `PartLookup` and
//! `SupplierLookup` add the queries only those two tables need.

use async_trait::async_trait;
use thiserror::Error;

use sparetrack_core::{CategoryId, Record, SupplierId};
use sparetrack_parts::Part;
use sparetrack_suppliers::{Conflict, Supplier};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryTable;
pub use postgres::{connect, PgRecord, PgTable};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// A unique constraint rejected the write.
    #[error("unique constraint violated in {operation}: {message}")]
    Conflict {
        operation: &'static str,
        message: String,
    },

    #[error("could not decode row: {0}")]
    Decode(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// CRUD over one table. Missing ids are `None`/`false`, never errors.
#[async_trait]
pub trait Table<R: Record>: Send + Sync {
    /// Persist a new record; the store assigns its id.
    async fn insert(&self, fields: R::Fields) -> Result<R, StoreError>;

    async fn get(&self, id: R::Id) -> Result<Option<R>, StoreError>;

    /// All records. Order is not part of the contract.
    async fn list(&self) -> Result<Vec<R>, StoreError>;

    /// Overwrite every mutable field of an existing record.
    async fn replace(&self, record: R) -> Result<Option<R>, StoreError>;

    async fn remove(&self, id: R::Id) -> Result<bool, StoreError>;
}

/// Reverse lookups the category and supplier services ask the part service.
#[async_trait]
pub trait PartLookup: Table<Part> {
    async fn any_with_category(&self, id: CategoryId) -> Result<bool, StoreError>;
    async fn any_with_supplier(&self, id: SupplierId) -> Result<bool, StoreError>;
}

/// Uniqueness of supplier contact fields.
#[async_trait]
pub trait SupplierLookup: Table<Supplier> {
    /// Which of `phone`/`email` another supplier already uses. `except` is
    /// the supplier being updated, whose own values never conflict.
    async fn conflicts(
        &self,
        phone: &str,
        email: &str,
        except: Option<SupplierId>,
    ) -> Result<Vec<Conflict>, StoreError>;
}
