//! Pipeline orchestration: config -> readers -> sync engine -> table.

mod stats;

pub use stats::ConversionStats;

use contracts::{CanonicalSeries, JobConfig, PipelineError, SourceConfig, WideTable};
use sync_engine::SyncEngine;
use tracing::{debug, instrument};

/// Run the marker pipeline: read all marker sources and synchronize them
#[instrument(name = "sync_markers", skip(job))]
pub fn sync_markers(job: &JobConfig) -> Result<WideTable, PipelineError> {
    let series = read_all(job.marker_sources())?;
    SyncEngine::new(job.sync.clone()).synchronize(&series)
}

/// Run the force pipeline: read all force-plate sources and synchronize them
///
/// The job-level sync policy may name a marker series as reference; that
/// series does not exist in the force pipeline, so the reference falls back
/// to the first plate source's native rate.
#[instrument(name = "sync_forces", skip(job))]
pub fn sync_forces(job: &JobConfig) -> Result<WideTable, PipelineError> {
    let series = read_all(job.force_sources())?;

    let mut policy = job.sync.clone();
    if let Some(reference) = policy.reference_series.clone() {
        if !series.iter().any(|s| s.name == reference) {
            debug!(
                reference = %reference,
                "reference series is not a force source, using plate rate"
            );
            policy.reference_series = None;
            if policy.target_rate.is_none() {
                policy.target_rate = series.first().map(|s| s.rate_hz);
            }
        }
    }

    SyncEngine::new(policy).synchronize(&series)
}

fn read_all<'a>(
    sources: impl Iterator<Item = &'a SourceConfig>,
) -> Result<Vec<CanonicalSeries>, PipelineError> {
    sources.map(readers::read_source).collect()
}
