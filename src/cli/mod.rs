//! Command-line parsing for the tourism arrival forecast dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline code.

use std::path::PathBuf;

use chrono::Datelike;
use clap::{Args, Parser, Subcommand};

use crate::domain::Horizon;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tourcast", version, about = "Tourism Arrival Forecast Dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one forecast, print summary statistics, the monthly table, and
    /// optionally an ASCII chart or a CSV export.
    Forecast(ForecastArgs),
    /// Print the countries available from the forecast service (useful for
    /// scripting).
    Countries(ApiArgs),
    /// Launch the interactive TUI dashboard.
    ///
    /// This uses the same underlying fetch/normalize/summarize pipeline as
    /// `tourcast forecast`, but renders results in a terminal UI using
    /// Ratatui and re-fetches whenever a parameter changes.
    Tui(ForecastArgs),
}

/// Connection options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct ApiArgs {
    /// Base URL of the forecast service (default: $TOURCAST_API_URL, else
    /// http://localhost:8000).
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,
}

/// Common options for fetching a forecast.
#[derive(Debug, Parser, Clone)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Country to forecast, or "Total" for the aggregate across all
    /// countries.
    #[arg(short = 'c', long, default_value = "Total")]
    pub country: String,

    /// First forecast year.
    #[arg(long, default_value_t = default_start_year())]
    pub start_year: i32,

    /// First forecast month (1-12).
    #[arg(long, default_value_t = default_start_month())]
    pub start_month: u32,

    /// Forecast horizon in months.
    #[arg(long, value_enum, default_value_t = Horizon::Twelve)]
    pub horizon: Horizon,

    /// Render an ASCII chart of the series (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the forecast series to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// The dashboard defaults to "forecast from now", like the web UI it
/// replaces.
fn default_start_year() -> i32 {
    chrono::Local::now().year()
}

fn default_start_month() -> u32 {
    chrono::Local::now().month()
}
