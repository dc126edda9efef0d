//! Input/output helpers.
//!
//! - forecast series export to CSV (`export`)

pub mod export;

pub use export::*;
