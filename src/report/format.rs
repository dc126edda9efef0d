//! Formatted terminal output: the run summary block and the monthly table.

use crate::domain::{ForecastParams, ForecastStats, MonthlyPoint};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Human month name for a 1-based month number; the raw number for anything
/// out of range (out-of-range input passes through the whole pipeline).
pub fn month_name(month: u32) -> String {
    match month {
        1..=12 => MONTH_NAMES[(month - 1) as usize].to_string(),
        other => other.to_string(),
    }
}

/// Format the run summary (parameters + derived statistics).
pub fn format_run_summary(params: &ForecastParams, stats: &ForecastStats) -> String {
    let mut out = String::new();

    out.push_str("=== tourcast - Tourism Arrival Forecast ===\n");
    out.push_str(&format!("Country: {}\n", params.country.display_name()));
    out.push_str(&format!(
        "Start: {} {}\n",
        month_name(params.start_month),
        params.start_year
    ));
    out.push_str(&format!("Horizon: {} months\n", params.horizon.months()));

    out.push('\n');
    out.push_str(&format!(
        "Total forecast ({}m): {}\n",
        params.horizon.months(),
        thousands(stats.total_arrivals)
    ));
    out.push_str(&format!(
        "Avg monthly arrivals: {}\n",
        thousands(stats.avg_monthly)
    ));
    out.push_str(&format!("Peak month: {}\n", stats.peak_label));
    out.push_str(&format!(
        "Growth trend: {}\n",
        fmt_growth(stats.growth_percent)
    ));

    out
}

/// Format the monthly detail table.
pub fn format_forecast_table(series: &[MonthlyPoint]) -> String {
    let mut out = String::new();

    if series.is_empty() {
        out.push_str("No forecast data returned.\n");
        return out;
    }

    out.push_str(&format!("{:>3} {:<8} {:>14}\n", "#", "month", "arrivals"));
    out.push_str(&format!("{:-<3} {:-<8} {:-<14}\n", "", "", ""));

    for (idx, point) in series.iter().enumerate() {
        out.push_str(&format!(
            "{:>3} {:<8} {:>14}\n",
            idx + 1,
            point.label,
            thousands(point.arrivals.round() as u64),
        ));
    }

    out
}

/// Signed growth percentage, decimal trimmed the way the dashboard shows it
/// (`+12.3%`, `-4.5%`, `0%`).
pub fn fmt_growth(growth: f64) -> String {
    if growth > 0.0 {
        format!("+{growth}%")
    } else {
        format!("{growth}%")
    }
}

/// Decimal grouping for arrival counts (`1234567` -> `"1,234,567"`).
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
