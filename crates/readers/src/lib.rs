//! # Readers
//!
//! Ingestion stage: parses one raw input file into a [`CanonicalSeries`]
//! of per-channel time series, normalized to SI units.
//!
//! Responsibilities:
//! - Format dispatch by [`SourceKind`]
//! - Unit normalization (mm -> m, N·mm -> N·m) at the read edge
//! - Monotonicity and shape checks: a malformed source fails fast with the
//!   offending row and field, never silently reordered or padded
//! - Explicit tagging of missing-value sentinels as invalid, never zero
//!
//! No resampling happens here.

mod common;
mod force_plate;
mod trc;
mod v3d;

pub use force_plate::read_force_plate;
pub use trc::read_trc;
pub use v3d::read_v3d;

use contracts::{CanonicalSeries, PipelineError, SourceConfig, SourceKind};
use tracing::{info, instrument};

/// Read one configured source into a canonical series
#[instrument(name = "read_source", skip(config), fields(source = %config.name, kind = ?config.kind))]
pub fn read_source(config: &SourceConfig) -> Result<CanonicalSeries, PipelineError> {
    let series = match config.kind {
        SourceKind::Landmarks | SourceKind::Targets => read_v3d(config),
        SourceKind::Trc => read_trc(config),
        SourceKind::ForcePlate => read_force_plate(config),
    }?;

    info!(
        source = %config.name,
        channels = series.channels().len(),
        frames = series.num_frames(),
        rate_hz = series.rate_hz,
        "source loaded"
    );
    metrics::counter!("reader_sources_total", "kind" => format!("{:?}", config.kind)).increment(1);

    Ok(series)
}
