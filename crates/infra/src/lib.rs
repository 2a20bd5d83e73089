//! Infrastructure layer: configuration, table storage (in-memory and
//! Postgres) and user accounts.

pub mod config;
pub mod store;
pub mod users;

pub use config::Settings;
pub use sqlx::PgPool;
pub use store::{connect, InMemoryTable, PartLookup, PgRecord, PgTable, StoreError, SupplierLookup, Table};
pub use users::{InMemoryUsers, PgUsers};
