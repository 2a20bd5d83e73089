//! Aggregation of per-service OpenAPI documents into one.
//!
//! Pipeline: fan out one fetch per configured service (`fetch`), prefix
//! every internal schema reference with the service name (`rewrite`), then
//! reparent paths and union schemas under a fixed header (`merge`).

pub mod error;
pub mod fetch;
pub mod merge;
pub mod rewrite;

pub use error::GatewayError;
pub use fetch::{Aggregator, DocSource, HttpDocSource, ServiceEndpoint};
pub use merge::{merge, ServiceDoc};
pub use rewrite::{rewrite_refs, SCHEMA_REF_PREFIX};
