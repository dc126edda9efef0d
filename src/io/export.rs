//! Export the forecast series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per month, a leading comment row carrying the parameter
//! snapshot the series was produced from.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{ForecastParams, MonthlyPoint};
use crate::error::AppError;

/// Write the forecast series to a CSV file.
pub fn write_forecast_csv(
    path: &Path,
    series: &[MonthlyPoint],
    params: &ForecastParams,
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;

    writeln!(
        file,
        "# country={} start={}-{:02} horizon={}m",
        params.country.display_name(),
        params.start_year,
        params.start_month,
        params.horizon.months(),
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    writeln!(file, "month,arrivals")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for point in series {
        writeln!(file, "{},{:.2}", point.label, point.arrivals)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CountrySelection, Horizon};

    #[test]
    fn export_writes_one_row_per_month() {
        let params = ForecastParams {
            country: CountrySelection::Total,
            start_year: 2026,
            start_month: 1,
            horizon: Horizon::Six,
        };
        let series = vec![
            MonthlyPoint {
                label: "2026-01".to_string(),
                arrivals: 150000.0,
            },
            MonthlyPoint {
                label: "2026-02".to_string(),
                arrivals: 163250.75,
            },
        ];

        let path = std::env::temp_dir().join("tourcast_export_test.csv");
        write_forecast_csv(&path, &series, &params).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "# country=Total start=2026-01 horizon=6m");
        assert_eq!(lines[1], "month,arrivals");
        assert_eq!(lines[2], "2026-01,150000.00");
        assert_eq!(lines[3], "2026-02,163250.75");
        assert_eq!(lines.len(), 4);
    }
}
