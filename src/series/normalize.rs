//! Forecast payload normalization.
//!
//! Turns whatever the service sent into the canonical series the rest of the
//! pipeline operates on. The contract is deliberately forgiving:
//!
//! - absent/malformed point list → empty series (a valid, successful result;
//!   statistics reset to their zero defaults, they never keep stale values)
//! - `predicted_arrivals` that is null/NaN/non-finite → 0
//! - response order is preserved as received; the service emits months
//!   chronologically and no re-sort happens here

use crate::data::api::RawForecastPoint;
use crate::domain::MonthlyPoint;

/// `"YYYY-MM"` label for a point, month zero-padded.
pub fn month_label(year: i32, month: u32) -> String {
    format!("{year}-{month:02}")
}

/// Build the canonical series from a decoded point list.
pub fn normalize_forecast(points: Option<&[RawForecastPoint]>) -> Vec<MonthlyPoint> {
    let Some(points) = points else {
        return Vec::new();
    };

    points
        .iter()
        .map(|p| MonthlyPoint {
            label: month_label(p.year, p.month),
            arrivals: coerce_arrivals(p.predicted_arrivals),
        })
        .collect()
}

/// Canonical arrival count: finite and non-negative, defaulting to 0.
fn coerce_arrivals(raw: Option<f64>) -> f64 {
    match raw {
        Some(v) if v.is_finite() => v.max(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(year: i32, month: u32, arrivals: Option<f64>) -> RawForecastPoint {
        RawForecastPoint {
            year,
            month,
            predicted_arrivals: arrivals,
        }
    }

    #[test]
    fn absent_payload_yields_empty_series() {
        assert!(normalize_forecast(None).is_empty());
        assert!(normalize_forecast(Some(&[])).is_empty());
    }

    #[test]
    fn labels_are_zero_padded() {
        let series = normalize_forecast(Some(&[point(2026, 3, Some(100.0))]));
        assert_eq!(series[0].label, "2026-03");

        let series = normalize_forecast(Some(&[point(2026, 11, Some(100.0))]));
        assert_eq!(series[0].label, "2026-11");
    }

    #[test]
    fn missing_and_non_finite_arrivals_default_to_zero() {
        let series = normalize_forecast(Some(&[
            point(2026, 1, None),
            point(2026, 2, Some(f64::NAN)),
            point(2026, 3, Some(f64::INFINITY)),
            point(2026, 4, Some(-250.0)),
            point(2026, 5, Some(180.5)),
        ]));

        let arrivals: Vec<f64> = series.iter().map(|p| p.arrivals).collect();
        assert_eq!(arrivals, vec![0.0, 0.0, 0.0, 0.0, 180.5]);
    }

    #[test]
    fn response_order_is_preserved() {
        // The service is trusted to emit chronological order; the normalizer
        // must not re-sort even when labels are out of order.
        let series = normalize_forecast(Some(&[
            point(2026, 12, Some(1.0)),
            point(2026, 1, Some(2.0)),
        ]));
        assert_eq!(series[0].label, "2026-12");
        assert_eq!(series[1].label, "2026-01");
    }
}
