//! Part domain module.
//!
//! A part references one category and one supplier by id; those references
//! are confirmed against the owning services by the application layer.

pub mod part;

pub use part::{
    Part, PartFields, PartInput, CATEGORY_REQUIRED, NAME_REQUIRED, PRICE_NOT_POSITIVE,
    PRICE_REQUIRED, SUPPLIER_REQUIRED,
};
