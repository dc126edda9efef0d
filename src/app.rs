//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds the API client from flags/environment
//! - runs the one-shot forecast pipeline or launches the TUI
//! - prints reports/plots and writes optional exports

use clap::Parser;

use crate::cli::{ApiArgs, Command, ForecastArgs};
use crate::data::api::ForecastClient;
use crate::domain::{CountrySelection, ForecastParams};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `tourcast` binary.
pub fn run() -> Result<(), AppError> {
    // We want `tourcast` and `tourcast -c India` to behave like
    // `tourcast tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the dashboard-first UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Forecast(args) => handle_forecast(args),
        Command::Countries(args) => handle_countries(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let client = ForecastClient::from_env(args.api.api_url.as_deref());
    let params = forecast_params_from_args(&args);
    let run = pipeline::run_forecast(&client, &params)?;

    println!("{}", crate::report::format_run_summary(&params, &run.stats));
    println!("{}", crate::report::format_forecast_table(&run.series));

    if args.plot && !args.no_plot && !run.series.is_empty() {
        let plot = crate::plot::render_series_plot(&run.series, args.width, args.height);
        println!("{plot}");
    }

    if let Some(path) = &args.export {
        crate::io::write_forecast_csv(path, &run.series, &params)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_countries(args: ApiArgs) -> Result<(), AppError> {
    let client = ForecastClient::from_env(args.api_url.as_deref());
    let countries = client.fetch_countries()?;
    for country in countries {
        println!("{country}");
    }
    Ok(())
}

fn handle_tui(args: ForecastArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

/// Build the initial parameter snapshot from CLI flags.
pub fn forecast_params_from_args(args: &ForecastArgs) -> ForecastParams {
    ForecastParams {
        country: CountrySelection::from_arg(&args.country),
        start_year: args.start_year,
        start_month: args.start_month,
        horizon: args.horizon,
    }
}

/// Rewrite argv so `tourcast` defaults to `tourcast tui`.
///
/// Rules:
/// - `tourcast`                     -> `tourcast tui`
/// - `tourcast -c India ...`        -> `tourcast tui -c India ...`
/// - `tourcast --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "forecast" | "countries" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
