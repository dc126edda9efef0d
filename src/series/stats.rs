//! Summary statistics over a canonical series.
//!
//! `summarize` is a pure function; the degenerate cases are part of its
//! contract, not incidental behavior:
//!
//! - empty series → all-zero defaults with `"-"` as the peak label
//! - zero first month → growth is 0, never a division by zero
//! - single point → growth is 0 (first == last)
//! - peak ties → first occurrence wins (strict `>` scan)

use crate::domain::{ForecastStats, MonthlyPoint};

/// Compute the summary statistics for a series.
pub fn summarize(series: &[MonthlyPoint]) -> ForecastStats {
    let Some(first) = series.first() else {
        return ForecastStats::default();
    };

    let total: f64 = series.iter().map(|p| p.arrivals).sum();
    let total_arrivals = total.round() as u64;
    let avg_monthly = (total_arrivals as f64 / series.len() as f64).round() as u64;

    let mut peak = first;
    for p in &series[1..] {
        if p.arrivals > peak.arrivals {
            peak = p;
        }
    }

    // `first == last` for a single point, so growth falls out as 0 without a
    // special case; the guards below only cover the zero and non-finite lanes.
    let last = &series[series.len() - 1];
    let growth_percent = if first.arrivals != 0.0 {
        let raw = (last.arrivals - first.arrivals) / first.arrivals * 100.0;
        if raw.is_finite() { round1(raw) } else { 0.0 }
    } else {
        0.0
    };

    ForecastStats {
        total_arrivals,
        avg_monthly,
        peak_label: peak.label.clone(),
        growth_percent,
    }
}

/// Round to one decimal place.
fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<MonthlyPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &arrivals)| MonthlyPoint {
                label: format!("2026-{:02}", i + 1),
                arrivals,
            })
            .collect()
    }

    #[test]
    fn empty_series_yields_defaults() {
        let stats = summarize(&[]);
        assert_eq!(stats, ForecastStats::default());
        assert_eq!(stats.peak_label, "-");
    }

    #[test]
    fn total_is_rounded_sum_and_avg_is_rounded_quotient() {
        let stats = summarize(&series(&[100.4, 200.4, 300.4]));
        // sum = 601.2 -> 601; avg = 601/3 = 200.33... -> 200
        assert_eq!(stats.total_arrivals, 601);
        assert_eq!(stats.avg_monthly, 200);

        let stats = summarize(&series(&[100.0, 101.0]));
        // avg = 201/2 = 100.5 -> rounds up, not truncated
        assert_eq!(stats.avg_monthly, 101);
    }

    #[test]
    fn peak_tie_goes_to_first_occurrence() {
        let stats = summarize(&series(&[10.0, 10.0, 5.0]));
        assert_eq!(stats.peak_label, "2026-01");
    }

    #[test]
    fn zero_first_month_gives_zero_growth() {
        let stats = summarize(&series(&[0.0, 50.0]));
        assert_eq!(stats.growth_percent, 0.0);
    }

    #[test]
    fn single_point_series() {
        let stats = summarize(&series(&[42.0]));
        assert_eq!(stats.growth_percent, 0.0);
        assert_eq!(stats.peak_label, "2026-01");
        assert_eq!(stats.total_arrivals, 42);
        assert_eq!(stats.avg_monthly, 42);
    }

    #[test]
    fn growth_is_rounded_to_one_decimal() {
        // (112.345 - 100) / 100 * 100 = 12.345 -> 12.3
        let stats = summarize(&series(&[100.0, 112.345]));
        assert_eq!(stats.growth_percent, 12.3);

        let stats = summarize(&series(&[100.0, 80.0]));
        assert_eq!(stats.growth_percent, -20.0);
    }
}
