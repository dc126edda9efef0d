//! Remote forecast service access.
//!
//! - HTTP client + wire types (`api`)

pub mod api;

pub use api::*;
