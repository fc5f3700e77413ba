//! Calendar lookups.
//!
//! The core only needs recent events with a title, description and start
//! time. Where they come from is behind [`EventSource`]; [`Provider`] is the
//! implementation that talks to an external provider executable.

pub mod date_range;
pub mod event;
pub mod protocol;
pub mod provider;

use std::future::Future;

use crate::error::FileMoverResult;

pub use date_range::DateRange;
pub use event::{CandidateEvent, EventTime};
pub use provider::Provider;

/// Anything that can list calendar events.
pub trait EventSource {
    /// Events starting within `range`, ordered by start time, at most `max_results`.
    fn list_events(
        &self,
        range: &DateRange,
        max_results: usize,
    ) -> impl Future<Output = FileMoverResult<Vec<CandidateEvent>>> + Send;
}
