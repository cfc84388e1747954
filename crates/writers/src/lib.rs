//! # Writers
//!
//! Format Writer and Slicer stages: take the merged [`WideTable`] and emit
//! strict TRC (marker trajectories) and MOT (ground reaction forces) files,
//! optionally cut into per-trial slices first.
//!
//! Serialization is fully buffered: a document is rendered in memory,
//! shape-checked, and then written atomically (temp file + rename in the
//! destination directory). A failed run never leaves a truncated output.
//!
//! [`WideTable`]: contracts::WideTable

mod document;
mod grf;
mod slicer;
mod trc;

pub use document::FormatDocument;
pub use grf::{render_grf, write_grf};
pub use slicer::slice_table;
pub use trc::{render_trc, write_trc};
