//! The forecast analytics pipeline.
//!
//! Everything with state-machine or ordering concerns lives here:
//!
//! - `params`: the validated query snapshot and its change events
//! - `orchestrator`: request dispatch, generation sequencing, stale discard
//! - `state`: the `{Idle, Loading, Ready, Failed}` result owner renderers read
//!
//! All mutation is serialized through a single event loop: parameter changes
//! and fetch completions arrive as `AppEvent`s over one `mpsc` channel, so no
//! locking is needed anywhere in the pipeline.

pub mod orchestrator;
pub mod params;
pub mod state;

pub use orchestrator::*;
pub use params::*;
pub use state::*;

use crate::data::api::{FetchError, ForecastPayload};
use crate::domain::ForecastParams;

/// Messages delivered to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// The parameter store replaced a field; the snapshot is the new truth.
    ParamsChanged(ForecastParams),
    /// The one-time country-catalog fetch finished.
    CountriesLoaded(Result<Vec<String>, FetchError>),
    /// A worker thread finished the physical fetch for `generation`.
    FetchFinished {
        generation: u64,
        outcome: Result<ForecastPayload, FetchError>,
    },
}
