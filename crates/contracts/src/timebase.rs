//! Common output time base shared by all resampled channels.

use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// Slack applied before flooring a span-to-frame-count division, so that a
/// span that is an exact multiple of the period is not truncated by
/// floating-point rounding.
const SPAN_EPSILON: f64 = 1e-6;

/// An ordered sequence of equally spaced output timestamps
///
/// Frame indices are 1-based and contiguous. Spacing is constant by
/// construction: `time(i) = start + i / rate_hz`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBase {
    start: f64,
    rate_hz: f64,
    len: usize,
}

impl TimeBase {
    /// Create a time base with an explicit frame count
    pub fn new(start: f64, rate_hz: f64, len: usize) -> Result<Self, PipelineError> {
        if rate_hz <= 0.0 || !rate_hz.is_finite() {
            return Err(PipelineError::config_validation(
                "rate_hz",
                format!("time base rate must be a positive finite number, got {rate_hz}"),
            ));
        }
        Ok(Self {
            start,
            rate_hz,
            len,
        })
    }

    /// Create a time base covering `[start, end]` at `rate_hz`
    ///
    /// Frame count is `floor((end - start) * rate) + 1`, so both endpoints are
    /// included when the span is a whole number of periods.
    pub fn from_span(start: f64, end: f64, rate_hz: f64) -> Result<Self, PipelineError> {
        if end < start {
            return Ok(Self::new(start, rate_hz, 0)?);
        }
        let len = ((end - start) * rate_hz + SPAN_EPSILON).floor() as usize + 1;
        Self::new(start, rate_hz, len)
    }

    pub fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    /// Spacing between consecutive frames, in seconds
    pub fn period(&self) -> f64 {
        1.0 / self.rate_hz
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Timestamp of the 0-based frame `idx`
    pub fn time(&self, idx: usize) -> f64 {
        self.start + idx as f64 / self.rate_hz
    }

    /// Iterator over all output timestamps
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(|i| self.time(i))
    }
}
