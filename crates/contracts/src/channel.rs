//! Per-channel time series, the output of a source reader.

use serde::{Deserialize, Serialize};

use crate::{PipelineError, Quantity};

/// Tolerance for comparing timestamps that should be identical
pub const TIME_EQ_TOLERANCE_S: f64 = 1e-9;

/// One sample of a tracked channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Timestamp in seconds on the source clock
    pub time: f64,

    /// Value vector (length == channel dimensionality), SI units
    pub values: Vec<f64>,

    /// False marks an occluded/missing sample; values are then meaningless
    pub valid: bool,
}

impl Sample {
    /// A valid sample
    pub fn new(time: f64, values: Vec<f64>) -> Self {
        Self {
            time,
            values,
            valid: true,
        }
    }

    /// An occluded/missing sample of the given dimensionality
    pub fn invalid(time: f64, dim: usize) -> Self {
        Self {
            time,
            values: vec![f64::NAN; dim],
            valid: false,
        }
    }
}

/// One tracked point's ordered time series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    /// Marker/landmark/plate-component label
    pub label: String,

    /// Physical quantity (decides output column semantics)
    pub quantity: Quantity,

    /// Value-vector dimensionality (3 for positions/forces/moments)
    pub dim: usize,

    /// Samples ordered by strictly increasing time
    pub samples: Vec<Sample>,
}

impl Channel {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Temporal coverage over valid samples: (first, last) valid timestamps
    pub fn valid_coverage(&self) -> Option<(f64, f64)> {
        let first = self.samples.iter().find(|s| s.valid)?.time;
        let last = self.samples.iter().rev().find(|s| s.valid)?.time;
        Some((first, last))
    }
}

/// A named collection of channels sharing one clock
///
/// Invariant: all channels have equal length and pairwise-equal timestamps.
/// `try_new` enforces this at construction; a raw source that violates it is
/// rejected rather than padded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalSeries {
    /// Source name (from configuration)
    pub name: String,

    /// Nominal sample rate in Hz
    pub rate_hz: f64,

    /// Declared start offset in seconds (already applied to timestamps)
    pub start_offset_s: f64,

    channels: Vec<Channel>,
}

impl CanonicalSeries {
    /// Construct a series, enforcing the shared-timestamp invariant
    pub fn try_new(
        name: impl Into<String>,
        rate_hz: f64,
        start_offset_s: f64,
        channels: Vec<Channel>,
    ) -> Result<Self, PipelineError> {
        let name = name.into();

        if rate_hz <= 0.0 {
            return Err(PipelineError::malformed_source(
                &name,
                None,
                None,
                format!("sample rate must be > 0, got {rate_hz}"),
            ));
        }

        if let Some(first) = channels.first() {
            for channel in &channels[1..] {
                if channel.len() != first.len() {
                    return Err(PipelineError::malformed_source(
                        &name,
                        None,
                        Some(channel.label.clone()),
                        format!(
                            "channel length {} differs from '{}' length {}",
                            channel.len(),
                            first.label,
                            first.len()
                        ),
                    ));
                }
                for (row, (a, b)) in first.samples.iter().zip(&channel.samples).enumerate() {
                    if (a.time - b.time).abs() > TIME_EQ_TOLERANCE_S {
                        return Err(PipelineError::malformed_source(
                            &name,
                            Some(row),
                            Some(channel.label.clone()),
                            format!("timestamp {} differs from '{}' timestamp {}", b.time, first.label, a.time),
                        ));
                    }
                }
            }
        }

        for channel in &channels {
            for (row, pair) in channel.samples.windows(2).enumerate() {
                if pair[1].time - pair[0].time <= TIME_EQ_TOLERANCE_S {
                    return Err(PipelineError::malformed_source(
                        &name,
                        Some(row + 1),
                        Some(channel.label.clone()),
                        format!(
                            "timestamps not strictly increasing: {} then {}",
                            pair[0].time, pair[1].time
                        ),
                    ));
                }
            }
        }

        Ok(Self {
            name,
            rate_hz,
            start_offset_s,
            channels,
        })
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn into_channels(self) -> Vec<Channel> {
        self.channels
    }

    /// Number of frames in the series (0 if it has no channels)
    pub fn num_frames(&self) -> usize {
        self.channels.first().map(Channel::len).unwrap_or(0)
    }

    /// Shared timestamp of frame `i`
    pub fn time(&self, i: usize) -> Option<f64> {
        self.channels.first().and_then(|c| c.samples.get(i)).map(|s| s.time)
    }

    /// First and last timestamps of the series
    pub fn span(&self) -> Option<(f64, f64)> {
        let first = self.time(0)?;
        let last = self.time(self.num_frames() - 1)?;
        Some((first, last))
    }
}
