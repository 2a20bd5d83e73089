//! Inventory domain module.
//!
//! Stock records per part, implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage). The clock is passed in by the caller.

pub mod item;

pub use item::{
    InventoryFields, InventoryInput, InventoryItem, RestockInput, PART_REQUIRED,
    QUANTITY_BELOW_ONE, QUANTITY_NEGATIVE, QUANTITY_REQUIRED, QUANTITY_UNSPECIFIED,
};
