//! Synchronization policy contracts shared across crates.

use serde::{Deserialize, Serialize};

/// Synchronizer/Resampler configuration
///
/// Exactly one of `reference_series` / `target_rate` drives the output time
/// base; the config validator enforces that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncPolicy {
    /// Series whose native rate and start define the time base
    #[serde(default)]
    pub reference_series: Option<String>,

    /// Explicit output rate in Hz; span is then the intersection of all
    /// series' temporal coverage
    #[serde(default)]
    pub target_rate: Option<f64>,

    /// Interpolation mode between bracketing valid samples
    #[serde(default)]
    pub interpolation: Interpolation,

    /// Maximum bracketing gap (seconds) across which interpolation is still
    /// honest; wider gaps yield invalid output samples
    #[serde(default = "default_max_gap_tolerance")]
    pub max_gap_tolerance_s: f64,

    /// Edge policy for timestamps outside a channel's native coverage
    #[serde(default)]
    pub extrapolate: Extrapolate,
}

fn default_max_gap_tolerance() -> f64 {
    0.1
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            reference_series: None,
            target_rate: None,
            interpolation: Interpolation::default(),
            max_gap_tolerance_s: default_max_gap_tolerance(),
            extrapolate: Extrapolate::default(),
        }
    }
}

/// Interpolation mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Straight line between the two nearest valid bracketing samples
    #[default]
    Linear,
    /// Copy the closer bracketing sample
    Nearest,
    /// Repeat the last valid sample forward
    Hold,
}

/// Edge policy for output timestamps outside a channel's coverage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolate {
    /// Outside coverage is invalid (extrapolation is opt-in)
    #[default]
    None,
    /// Hold the nearest boundary sample
    Clamp,
}
