//! Supplier domain module.
//!
//! Field rules for suppliers (contact format checks included). Uniqueness of
//! phone and email is a store concern; only the messages live here.

pub mod supplier;

pub use supplier::{
    is_valid_email, is_valid_phone, Conflict, Supplier, SupplierFields, SupplierInput,
    COMPANY_REQUIRED, EMAIL_INVALID, EMAIL_REQUIRED, EMAIL_TAKEN, PHONE_INVALID, PHONE_REQUIRED,
    PHONE_TAKEN,
};
