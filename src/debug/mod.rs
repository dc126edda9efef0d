//! Debug bundle writer for inspecting the current analytics state.
//!
//! Useful when a forecast looks wrong in the field: one keypress captures the
//! parameter snapshot, the state tag, the derived statistics, and the full
//! normalized series into a timestamped markdown file under `debug/`.

use std::fs::create_dir_all;
use std::path::PathBuf;

use chrono::Local;

use crate::analytics::{Analytics, AnalyticsState};
use crate::domain::ForecastParams;
use crate::error::AppError;

pub fn write_debug_bundle(
    params: &ForecastParams,
    analytics: &Analytics,
) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("tourcast_debug_{ts}.md"));

    std::fs::write(&path, render_bundle(params, analytics))
        .map_err(|e| AppError::new(4, format!("Failed to write debug file: {e}")))?;

    Ok(path)
}

fn render_bundle(params: &ForecastParams, analytics: &Analytics) -> String {
    let mut out = String::new();

    out.push_str("# tourcast debug bundle\n");
    out.push_str(&format!("- generated: {}\n", Local::now().to_rfc3339()));
    out.push_str(&format!("- country: {}\n", params.country.display_name()));
    out.push_str(&format!(
        "- start: {}-{:02}\n",
        params.start_year, params.start_month
    ));
    out.push_str(&format!("- horizon: {}m\n", params.horizon.months()));

    let state_tag = match analytics.state() {
        AnalyticsState::Idle => "idle",
        AnalyticsState::Loading => "loading",
        AnalyticsState::Ready { .. } => "ready",
        AnalyticsState::Failed { .. } => "failed",
    };
    out.push_str(&format!("- state: {state_tag}\n"));
    if let Some(message) = analytics.error() {
        out.push_str(&format!("- error: {message}\n"));
    }

    let stats = analytics.stats();
    out.push_str("\n## Statistics\n");
    out.push_str(&format!("- total_arrivals: {}\n", stats.total_arrivals));
    out.push_str(&format!("- avg_monthly: {}\n", stats.avg_monthly));
    out.push_str(&format!("- peak: {}\n", stats.peak_label));
    out.push_str(&format!("- growth_percent: {}\n", stats.growth_percent));

    out.push_str("\n## Monthly series\n");
    let series = analytics.series();
    if series.is_empty() {
        out.push_str("(empty)\n");
    } else {
        out.push_str("| month | arrivals |\n");
        out.push_str("| - | - |\n");
        for point in series {
            out.push_str(&format!("| {} | {:.2} |\n", point.label, point.arrivals));
        }
    }

    out
}
