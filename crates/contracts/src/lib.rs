//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures
//! shared across the conversion pipeline. All business crates depend only on
//! this crate; reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Timestamps are seconds (f64) on each source's own clock
//! - Frame indices on the output time base are 1-based and contiguous
//!
//! ## Unit Model
//! - Channels always carry SI values internally (meters, seconds, newtons,
//!   newton-meters); unit conversion happens at the read and write edges

mod channel;
mod error;
mod job;
mod sync_policy;
mod table;
mod timebase;
mod units;

pub use channel::*;
pub use error::*;
pub use job::*;
pub use sync_policy::*;
pub use table::*;
pub use timebase::*;
pub use units::*;
