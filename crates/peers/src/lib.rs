//! Cross-service lookups.
//!
//! A dependent service never reads another service's table. It asks the
//! owning service over HTTP whether an id exists (`Directory`) and, before a
//! category or supplier is deleted, whether any part still references it
//! (`PartUsage`). Both seams are traits so application code can be driven by
//! the in-process doubles in [`local`].

pub mod client;
pub mod directory;
pub mod error;
pub mod local;
pub mod usage;
pub mod views;

pub use client::{Credentials, PeerClient, PeerOptions};
pub use directory::{
    CategoryDirectory, Directory, HttpDirectory, PartDirectory, SupplierDirectory,
};
pub use error::PeerError;
pub use usage::{HttpPartUsage, PartUsage};
pub use views::{CategoryView, PartView, SupplierView};
