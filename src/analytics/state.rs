//! The externally-visible result of the pipeline.
//!
//! `Analytics` is the single owner renderers read. Transitions replace the
//! whole variant at once, so a consumer can never observe a series without its
//! matching statistics, or statistics computed from a superseded series.

use crate::domain::{ForecastStats, MonthlyPoint};

/// Exactly one variant is active at a time.
///
/// `Idle → Loading → {Ready | Failed}`, and any state returns to `Loading`
/// when new parameters dispatch. There is no terminal state.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsState {
    Idle,
    Loading,
    Ready {
        series: Vec<MonthlyPoint>,
        stats: ForecastStats,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug)]
pub struct Analytics {
    state: AnalyticsState,
}

impl Analytics {
    pub fn new() -> Self {
        Self {
            state: AnalyticsState::Idle,
        }
    }

    pub fn state(&self) -> &AnalyticsState {
        &self.state
    }

    /// Entered synchronously when a request dispatches. Drops any previously
    /// displayed data: a new cycle starts from defaults, never from stale
    /// success data.
    pub fn begin_loading(&mut self) {
        self.state = AnalyticsState::Loading;
    }

    /// Commit a fully normalized series and its statistics in one step.
    pub fn commit(&mut self, series: Vec<MonthlyPoint>, stats: ForecastStats) {
        self.state = AnalyticsState::Ready { series, stats };
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = AnalyticsState::Failed {
            message: message.into(),
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, AnalyticsState::Loading)
    }

    /// The committed series; empty outside `Ready`.
    pub fn series(&self) -> &[MonthlyPoint] {
        match &self.state {
            AnalyticsState::Ready { series, .. } => series,
            _ => &[],
        }
    }

    /// The committed statistics; defaults outside `Ready`.
    pub fn stats(&self) -> ForecastStats {
        match &self.state {
            AnalyticsState::Ready { stats, .. } => stats.clone(),
            _ => ForecastStats::default(),
        }
    }

    /// The failure message, only when `Failed`.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            AnalyticsState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_fixture() -> (Vec<MonthlyPoint>, ForecastStats) {
        let series = vec![MonthlyPoint {
            label: "2026-01".to_string(),
            arrivals: 120.0,
        }];
        let stats = crate::series::summarize(&series);
        (series, stats)
    }

    #[test]
    fn starts_idle_with_default_reads() {
        let analytics = Analytics::new();
        assert_eq!(*analytics.state(), AnalyticsState::Idle);
        assert!(analytics.series().is_empty());
        assert_eq!(analytics.stats(), ForecastStats::default());
        assert!(analytics.error().is_none());
    }

    #[test]
    fn loading_replaces_ready_data_with_defaults() {
        let mut analytics = Analytics::new();
        let (series, stats) = ready_fixture();
        analytics.begin_loading();
        analytics.commit(series, stats);
        assert_eq!(analytics.stats().total_arrivals, 120);

        analytics.begin_loading();
        assert!(analytics.is_loading());
        assert!(analytics.series().is_empty());
        assert_eq!(analytics.stats(), ForecastStats::default());
    }

    #[test]
    fn failure_carries_message_and_clears_data() {
        let mut analytics = Analytics::new();
        let (series, stats) = ready_fixture();
        analytics.commit(series, stats);

        analytics.begin_loading();
        analytics.fail("Country not found");
        assert_eq!(analytics.error(), Some("Country not found"));
        assert!(analytics.series().is_empty());
        assert_eq!(analytics.stats(), ForecastStats::default());

        // Re-entrant: a failure is recoverable by dispatching again.
        analytics.begin_loading();
        assert!(analytics.is_loading());
        assert!(analytics.error().is_none());
    }
}
