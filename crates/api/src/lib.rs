//! HTTP surface of the spare-parts services: routing, wire mapping,
//! application services and process wiring.

pub mod app;
pub mod middleware;
