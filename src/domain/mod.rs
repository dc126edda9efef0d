//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the query parameters driving a forecast (`ForecastParams`, `Horizon`,
//!   `CountrySelection`)
//! - the canonical normalized series point (`MonthlyPoint`)
//! - the derived summary statistics (`ForecastStats`)

pub mod types;

pub use types::*;
