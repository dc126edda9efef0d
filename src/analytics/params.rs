//! The validated query parameters and their change events.
//!
//! The store owns the active snapshot. Each setter replaces one field; a
//! *changed* value publishes `AppEvent::ParamsChanged` with a fresh snapshot
//! so the orchestrator can dispatch. Setting a field to its current value
//! publishes nothing.
//!
//! There is no cross-field validation and no numeric clamping here: the TUI's
//! arrow adjusters keep themselves in range, but a free-typed year like 1850
//! flows through to the service untouched, and the service's rejection comes
//! back as a normal `Failed` state.

use std::sync::mpsc::Sender;

use crate::analytics::AppEvent;
use crate::domain::{CountrySelection, ForecastParams, Horizon};

pub struct ParameterStore {
    current: ForecastParams,
    events: Sender<AppEvent>,
}

impl ParameterStore {
    pub fn new(initial: ForecastParams, events: Sender<AppEvent>) -> Self {
        Self {
            current: initial,
            events,
        }
    }

    pub fn current(&self) -> &ForecastParams {
        &self.current
    }

    pub fn set_country(&mut self, country: CountrySelection) {
        if self.current.country != country {
            self.current.country = country;
            self.publish();
        }
    }

    pub fn set_start_year(&mut self, start_year: i32) {
        if self.current.start_year != start_year {
            self.current.start_year = start_year;
            self.publish();
        }
    }

    pub fn set_start_month(&mut self, start_month: u32) {
        if self.current.start_month != start_month {
            self.current.start_month = start_month;
            self.publish();
        }
    }

    pub fn set_horizon(&mut self, horizon: Horizon) {
        if self.current.horizon != horizon {
            self.current.horizon = horizon;
            self.publish();
        }
    }

    fn publish(&self) {
        // The receiver only disappears during shutdown; a dropped event is
        // harmless then.
        let _ = self
            .events
            .send(AppEvent::ParamsChanged(self.current.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    fn initial() -> ForecastParams {
        ForecastParams {
            country: CountrySelection::Total,
            start_year: 2026,
            start_month: 8,
            horizon: Horizon::Twelve,
        }
    }

    #[test]
    fn changed_field_publishes_full_snapshot() {
        let (tx, rx) = channel();
        let mut store = ParameterStore::new(initial(), tx);

        store.set_country(CountrySelection::Named("India".to_string()));

        match rx.try_recv().unwrap() {
            AppEvent::ParamsChanged(snapshot) => {
                assert_eq!(
                    snapshot.country,
                    CountrySelection::Named("India".to_string())
                );
                assert_eq!(snapshot.start_year, 2026);
                assert_eq!(snapshot.horizon, Horizon::Twelve);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unchanged_value_publishes_nothing() {
        let (tx, rx) = channel();
        let mut store = ParameterStore::new(initial(), tx);

        store.set_horizon(Horizon::Twelve);
        store.set_start_month(8);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn out_of_range_numbers_pass_through_uncoerced() {
        let (tx, rx) = channel();
        let mut store = ParameterStore::new(initial(), tx);

        store.set_start_year(1850);
        store.set_start_month(13);

        assert_eq!(store.current().start_year, 1850);
        assert_eq!(store.current().start_month, 13);
        assert_eq!(rx.iter().take(2).count(), 2);
    }
}
