//! # Sync Engine
//!
//! Temporal alignment of heterogeneous capture streams.
//!
//! Pipeline position: takes the [`CanonicalSeries`] produced by the readers,
//! chooses an output [`TimeBase`] (reference series or explicit target rate
//! over the coverage intersection), resamples every channel onto it, and
//! merges the result into one rectangular [`WideTable`] for the writers.
//!
//! Honesty over completeness: a frame with no defensible value is marked
//! invalid rather than extrapolated, and a merge that would produce an empty
//! table fails loudly.
//!
//! [`CanonicalSeries`]: contracts::CanonicalSeries
//! [`TimeBase`]: contracts::TimeBase
//! [`WideTable`]: contracts::WideTable

mod engine;
mod merge;
mod resample;
mod timebase;

pub use engine::SyncEngine;
pub use merge::{merge, SyncedChannel};
pub use resample::resample_channel;
pub use timebase::build_timebase;
