//! Merge resampled channels into one rectangular table.

use contracts::{PipelineError, ResampledChannel, TimeBase, WideTable};
use tracing::warn;

/// A resampled channel tagged with its source's precedence
///
/// Lower precedence wins label conflicts and sorts first in the output.
pub struct SyncedChannel {
    pub precedence: usize,
    pub channel: ResampledChannel,
}

/// Assemble the output table from resampled channels
///
/// Column order is deterministic: source precedence (configuration order),
/// then label. Duplicate labels of equal dimensionality keep the
/// higher-precedence channel; conflicting dimensionality was already rejected
/// upstream. A table with zero rows or zero columns is an [`EmptyMerge`]
/// error, never an empty file.
///
/// [`EmptyMerge`]: PipelineError::EmptyMerge
pub fn merge(
    timebase: TimeBase,
    mut channels: Vec<SyncedChannel>,
) -> Result<WideTable, PipelineError> {
    channels.sort_by(|a, b| {
        (a.precedence, &a.channel.label).cmp(&(b.precedence, &b.channel.label))
    });

    let mut columns: Vec<ResampledChannel> = Vec::with_capacity(channels.len());
    for synced in channels {
        if let Some(kept) = columns.iter().find(|c| c.label == synced.channel.label) {
            // Same label, same dim: precedence already decided the winner
            warn!(
                label = %kept.label,
                "duplicate channel label, keeping higher-precedence source"
            );
            continue;
        }
        columns.push(synced.channel);
    }

    if timebase.is_empty() {
        return Err(PipelineError::empty_merge(
            "output time base has no frames (no shared temporal coverage)",
        ));
    }
    if columns.is_empty() {
        return Err(PipelineError::empty_merge("no channels survived the merge"));
    }

    WideTable::try_new(timebase, columns)
}
