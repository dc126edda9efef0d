//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - held in the parameter store and cloned into request snapshots
//! - passed through the fetch/normalize/summarize pipeline
//! - read directly by renderers (CLI report, TUI widgets)

use clap::ValueEnum;

/// Which series to forecast: the aggregate across all countries, or a single
/// origin country by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountrySelection {
    Total,
    Named(String),
}

impl CountrySelection {
    /// Parse a CLI/UI string. `"Total"` (any case) selects the aggregate.
    pub fn from_arg(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("total") {
            CountrySelection::Total
        } else {
            CountrySelection::Named(trimmed.to_string())
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            CountrySelection::Total => "Total",
            CountrySelection::Named(name) => name,
        }
    }

    pub fn is_total(&self) -> bool {
        matches!(self, CountrySelection::Total)
    }
}

/// Forecast horizon in months.
///
/// The forecast service only supports these four windows, so the horizon is a
/// closed enum rather than a free integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Horizon {
    #[value(name = "6")]
    Six,
    #[value(name = "12")]
    Twelve,
    #[value(name = "18")]
    Eighteen,
    #[value(name = "24")]
    TwentyFour,
}

impl Horizon {
    pub fn months(self) -> u32 {
        match self {
            Horizon::Six => 6,
            Horizon::Twelve => 12,
            Horizon::Eighteen => 18,
            Horizon::TwentyFour => 24,
        }
    }

    /// Next longer window, wrapping around (used by the TUI adjuster).
    pub fn next(self) -> Self {
        match self {
            Horizon::Six => Horizon::Twelve,
            Horizon::Twelve => Horizon::Eighteen,
            Horizon::Eighteen => Horizon::TwentyFour,
            Horizon::TwentyFour => Horizon::Six,
        }
    }

    /// Next shorter window, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            Horizon::Six => Horizon::TwentyFour,
            Horizon::Twelve => Horizon::Six,
            Horizon::Eighteen => Horizon::Twelve,
            Horizon::TwentyFour => Horizon::Eighteen,
        }
    }
}

/// One immutable query snapshot.
///
/// A new snapshot supersedes the prior one; in-flight fetches for superseded
/// snapshots are discarded by the orchestrator's generation check.
///
/// `start_year`/`start_month` are passed to the service exactly as entered;
/// the service is the authority on rejecting out-of-range values.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastParams {
    pub country: CountrySelection,
    pub start_year: i32,
    pub start_month: u32,
    pub horizon: Horizon,
}

/// A canonical, normalized point of the forecast series.
///
/// `arrivals` is always finite and non-negative; whatever the wire carried
/// (null, NaN, a numeric string, a negative value) has been coerced by the
/// normalizer before this type exists.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPoint {
    /// `"YYYY-MM"` month label.
    pub label: String,
    pub arrivals: f64,
}

/// Summary statistics derived from a canonical series.
///
/// Never mutated independently: recomputed from scratch whenever the series
/// changes, and published atomically alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastStats {
    pub total_arrivals: u64,
    pub avg_monthly: u64,
    /// Label of the peak month, `"-"` when the series is empty.
    pub peak_label: String,
    /// Last-vs-first growth in percent, rounded to one decimal.
    pub growth_percent: f64,
}

impl Default for ForecastStats {
    fn default() -> Self {
        Self {
            total_arrivals: 0,
            avg_monthly: 0,
            peak_label: "-".to_string(),
            growth_percent: 0.0,
        }
    }
}
