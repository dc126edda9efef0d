//! Canonical series construction and summary statistics.
//!
//! - wire points → ordered `MonthlyPoint` series (`normalize`)
//! - series → `ForecastStats` (`stats`)

pub mod normalize;
pub mod stats;

pub use normalize::*;
pub use stats::*;
