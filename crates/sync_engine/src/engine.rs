//! The synchronization engine: time base, resampling, merge.

use std::collections::HashMap;
use std::time::Instant;

use contracts::{CanonicalSeries, PipelineError, SyncPolicy, WideTable};
use tracing::{info, instrument};

use crate::merge::{merge, SyncedChannel};
use crate::resample::resample_channel;
use crate::timebase::build_timebase;

/// Drives a set of canonical series onto one shared time base
pub struct SyncEngine {
    policy: SyncPolicy,
}

impl SyncEngine {
    pub fn new(policy: SyncPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    /// Align all series and merge them into one rectangular table
    ///
    /// Series precedence follows their order in `series` (configuration
    /// order). Duplicate labels across series are allowed only at equal
    /// dimensionality; a dimensionality conflict is an
    /// [`IncompatibleSeries`] error.
    ///
    /// [`IncompatibleSeries`]: PipelineError::IncompatibleSeries
    #[instrument(name = "synchronize", skip_all, fields(series = series.len()))]
    pub fn synchronize(&self, series: &[CanonicalSeries]) -> Result<WideTable, PipelineError> {
        let started = Instant::now();

        self.check_label_conflicts(series)?;

        let timebase = build_timebase(series, &self.policy)?;

        let mut channels = Vec::new();
        for (precedence, s) in series.iter().enumerate() {
            for channel in s.channels() {
                channels.push(SyncedChannel {
                    precedence,
                    channel: resample_channel(channel, &timebase, &self.policy),
                });
            }
        }

        let table = merge(timebase, channels)?;

        info!(
            frames = table.num_frames(),
            columns = table.num_columns(),
            invalid_cells = table.invalid_cell_count(),
            "synchronization complete"
        );
        metrics::histogram!("sync_duration_seconds").record(started.elapsed().as_secs_f64());
        metrics::counter!("sync_frames_total").increment(table.num_frames() as u64);

        Ok(table)
    }

    fn check_label_conflicts(&self, series: &[CanonicalSeries]) -> Result<(), PipelineError> {
        // label -> (owning series, dim) of first occurrence
        let mut seen: HashMap<&str, (&str, usize)> = HashMap::new();
        for s in series {
            for channel in s.channels() {
                match seen.get(channel.label.as_str()) {
                    Some(&(owner, dim)) if dim != channel.dim => {
                        return Err(PipelineError::incompatible_series(
                            &channel.label,
                            format!(
                                "dimensionality {} in '{}' conflicts with {} in '{}'",
                                channel.dim, s.name, dim, owner
                            ),
                        ));
                    }
                    Some(_) => {}
                    None => {
                        seen.insert(channel.label.as_str(), (s.name.as_str(), channel.dim));
                    }
                }
            }
        }
        Ok(())
    }
}
