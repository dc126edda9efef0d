//! Request dispatch and completion sequencing.
//!
//! The orchestrator owns in-flight request identity. Every dispatch bumps a
//! monotonically increasing generation number and moves the state machine to
//! `Loading` synchronously; the physical fetch runs on a worker thread (the
//! client is blocking reqwest) and its outcome comes back to the event loop as
//! `AppEvent::FetchFinished`.
//!
//! The one hard ordering rule: only the completion matching the *current*
//! generation may touch the state machine. A slow response for superseded
//! parameters is discarded without a trace, neither an error nor a success.
//! Physical cancellation is not attempted; the request is allowed to finish
//! and its result dropped.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::analytics::{Analytics, AppEvent};
use crate::data::api::{FetchError, ForecastPayload, ForecastSource};
use crate::domain::ForecastParams;
use crate::series::{normalize_forecast, summarize};

/// What `resolve` did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The completion was current and the state machine was updated.
    Applied,
    /// The completion belonged to a superseded generation and was discarded.
    Stale,
}

pub struct FetchOrchestrator {
    source: Arc<dyn ForecastSource>,
    events: Sender<AppEvent>,
    generation: u64,
}

impl FetchOrchestrator {
    pub fn new(source: Arc<dyn ForecastSource>, events: Sender<AppEvent>) -> Self {
        Self {
            source,
            events,
            generation: 0,
        }
    }

    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Claim the next generation and enter `Loading`.
    ///
    /// Split out from `dispatch` so sequencing can be driven without threads.
    pub fn begin(&mut self, analytics: &mut Analytics) -> u64 {
        self.generation += 1;
        analytics.begin_loading();
        self.generation
    }

    /// Dispatch one logical request for a parameter snapshot.
    pub fn dispatch(&mut self, params: &ForecastParams, analytics: &mut Analytics) -> u64 {
        let generation = self.begin(analytics);
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        let params = params.clone();

        thread::spawn(move || {
            let outcome = source.fetch_forecast(&params);
            // The event loop may already be gone on shutdown; nothing to do.
            let _ = events.send(AppEvent::FetchFinished {
                generation,
                outcome,
            });
        });

        generation
    }

    /// Apply a completion, or discard it when stale.
    ///
    /// On the current generation, success runs the normalizer and the
    /// statistics engine and commits both atomically; failure moves to
    /// `Failed` with the most specific message available.
    pub fn resolve(
        &mut self,
        generation: u64,
        outcome: Result<ForecastPayload, FetchError>,
        analytics: &mut Analytics,
    ) -> Resolution {
        if generation != self.generation {
            return Resolution::Stale;
        }

        match outcome {
            Ok(payload) => {
                let series = normalize_forecast(payload.forecast.as_deref());
                let stats = summarize(&series);
                analytics.commit(series, stats);
            }
            Err(err) => analytics.fail(err.to_string()),
        }

        Resolution::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::mpsc::{Receiver, channel};

    use crate::analytics::AnalyticsState;
    use crate::data::api::RawForecastPoint;
    use crate::domain::{CountrySelection, Horizon};

    fn params_for_year(start_year: i32) -> ForecastParams {
        ForecastParams {
            country: CountrySelection::Total,
            start_year,
            start_month: 1,
            horizon: Horizon::Twelve,
        }
    }

    fn payload(arrivals: f64) -> ForecastPayload {
        ForecastPayload {
            forecast: Some(vec![RawForecastPoint {
                year: 2026,
                month: 1,
                predicted_arrivals: Some(arrivals),
            }]),
            error: None,
        }
    }

    /// Never actually fetches; sequencing tests drive `begin`/`resolve`
    /// directly.
    struct InertSource;

    impl ForecastSource for InertSource {
        fn fetch_forecast(&self, _params: &ForecastParams) -> Result<ForecastPayload, FetchError> {
            Err(FetchError::Transport("inert".to_string()))
        }
    }

    fn inert_orchestrator() -> (FetchOrchestrator, Analytics) {
        // These tests drive sequencing directly and never route events.
        let (tx, _rx) = channel();
        (
            FetchOrchestrator::new(Arc::new(InertSource), tx),
            Analytics::new(),
        )
    }

    #[test]
    fn stale_completion_is_discarded_silently() {
        let (mut orchestrator, mut analytics) = inert_orchestrator();

        let gen1 = orchestrator.begin(&mut analytics);
        let gen2 = orchestrator.begin(&mut analytics);
        assert!(analytics.is_loading());

        // The newer request resolves first and wins.
        assert_eq!(
            orchestrator.resolve(gen2, Ok(payload(200.0)), &mut analytics),
            Resolution::Applied
        );
        assert_eq!(analytics.stats().total_arrivals, 200);

        // The older one straggles in afterwards: no state change, no error.
        assert_eq!(
            orchestrator.resolve(gen1, Ok(payload(100.0)), &mut analytics),
            Resolution::Stale
        );
        assert_eq!(analytics.stats().total_arrivals, 200);

        // A stale failure is equally invisible.
        assert_eq!(
            orchestrator.resolve(
                gen1,
                Err(FetchError::Transport("late timeout".to_string())),
                &mut analytics
            ),
            Resolution::Stale
        );
        assert!(analytics.error().is_none());
    }

    #[test]
    fn current_failure_surfaces_message() {
        let (mut orchestrator, mut analytics) = inert_orchestrator();

        let generation = orchestrator.begin(&mut analytics);
        orchestrator.resolve(
            generation,
            Err(FetchError::Api("Country not found".to_string())),
            &mut analytics,
        );
        assert_eq!(analytics.error(), Some("Country not found"));
    }

    #[test]
    fn empty_payload_commits_defaults_not_failure() {
        let (mut orchestrator, mut analytics) = inert_orchestrator();

        let generation = orchestrator.begin(&mut analytics);
        let outcome = Ok(ForecastPayload {
            forecast: None,
            error: None,
        });
        assert_eq!(
            orchestrator.resolve(generation, outcome, &mut analytics),
            Resolution::Applied
        );

        match analytics.state() {
            AnalyticsState::Ready { series, stats } => {
                assert!(series.is_empty());
                assert_eq!(*stats, crate::domain::ForecastStats::default());
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    /// Completes each fetch only when the test releases its gate, keyed by
    /// the snapshot's start year. Completion order is therefore fully
    /// controlled even though `dispatch` spawns real threads.
    struct GatedSource {
        gates: Mutex<HashMap<i32, Receiver<Result<ForecastPayload, FetchError>>>>,
    }

    impl ForecastSource for GatedSource {
        fn fetch_forecast(&self, params: &ForecastParams) -> Result<ForecastPayload, FetchError> {
            let gate = self
                .gates
                .lock()
                .unwrap()
                .remove(&params.start_year)
                .expect("one gate per dispatched year");
            gate.recv().unwrap()
        }
    }

    #[test]
    fn out_of_order_network_completion_keeps_latest_result() {
        let (events_tx, events_rx) = channel();
        let (gate1_tx, gate1_rx) = channel();
        let (gate2_tx, gate2_rx) = channel();

        let source = Arc::new(GatedSource {
            gates: Mutex::new(HashMap::from([(2025, gate1_rx), (2026, gate2_rx)])),
        });
        let mut orchestrator = FetchOrchestrator::new(source, events_tx);
        let mut analytics = Analytics::new();

        let gen1 = orchestrator.dispatch(&params_for_year(2025), &mut analytics);
        let gen2 = orchestrator.dispatch(&params_for_year(2026), &mut analytics);
        assert!(analytics.is_loading());
        assert_eq!(orchestrator.current_generation(), gen2);

        // Release the newer request first, then the older one.
        gate2_tx.send(Ok(payload(2600.0))).unwrap();
        let AppEvent::FetchFinished {
            generation,
            outcome,
        } = events_rx.recv().unwrap()
        else {
            panic!("expected a fetch completion");
        };
        assert_eq!(generation, gen2);
        assert_eq!(
            orchestrator.resolve(generation, outcome, &mut analytics),
            Resolution::Applied
        );

        gate1_tx.send(Ok(payload(2500.0))).unwrap();
        let AppEvent::FetchFinished {
            generation,
            outcome,
        } = events_rx.recv().unwrap()
        else {
            panic!("expected a fetch completion");
        };
        assert_eq!(generation, gen1);
        assert_eq!(
            orchestrator.resolve(generation, outcome, &mut analytics),
            Resolution::Stale
        );

        // Only the latest snapshot's result is visible.
        assert_eq!(analytics.stats().total_arrivals, 2600);
    }
}
