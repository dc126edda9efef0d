//! Terminal plotting.
//!
//! - fixed-grid ASCII chart of the forecast series (`ascii`)

pub mod ascii;

pub use ascii::*;
