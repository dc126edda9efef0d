//! Shared "forecast pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> normalize -> summarize
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::data::api::ForecastClient;
use crate::domain::{ForecastParams, ForecastStats, MonthlyPoint};
use crate::error::AppError;
use crate::series::{normalize_forecast, summarize};

/// All computed outputs of a single forecast run.
#[derive(Debug, Clone)]
pub struct ForecastRun {
    pub series: Vec<MonthlyPoint>,
    pub stats: ForecastStats,
}

/// Execute the full pipeline synchronously and return the computed outputs.
///
/// This is the one-shot path: the TUI goes through the orchestrator instead so
/// stale completions can be discarded.
pub fn run_forecast(
    client: &ForecastClient,
    params: &ForecastParams,
) -> Result<ForecastRun, AppError> {
    let payload = client.fetch_forecast(params)?;
    let series = normalize_forecast(payload.forecast.as_deref());
    let stats = summarize(&series);
    Ok(ForecastRun { series, stats })
}
