//! HTTP routes, one file per service surface.
//!
//! Domain routers are mounted under `/api/<collection>`; `system` holds the
//! endpoints every process serves.

pub mod auth;
pub mod categories;
pub mod gateway;
pub mod inventory;
pub mod parts;
pub mod suppliers;
pub mod system;
