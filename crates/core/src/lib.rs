//! `sparetrack-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by every service
//! (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod validation;

pub use entity::{Entity, Record};
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, InventoryId, PartId, SupplierId, UserId};
pub use validation::{is_present, Violations};
