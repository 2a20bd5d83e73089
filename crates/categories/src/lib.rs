//! Category domain module.
//!
//! Field rules for categories, implemented purely as deterministic domain
//! logic (no IO, no HTTP, no storage).

pub mod category;

pub use category::{Category, CategoryFields, CategoryInput, NAME_REQUIRED};
