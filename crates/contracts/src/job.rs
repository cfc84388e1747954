//! Job configuration model.
//!
//! Describes one complete conversion job: input sources, synchronization
//! policy, output files, and optional per-trial slicing. Source order in the
//! configuration defines merge precedence.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{LengthUnit, SyncPolicy};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete conversion job configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Input sources, in precedence order
    pub sources: Vec<SourceConfig>,

    /// Synchronization policy
    #[serde(default)]
    pub sync: SyncPolicy,

    /// Marker output (TRC)
    pub output: OutputConfig,

    /// Ground-reaction-force output (MOT), optional
    #[serde(default)]
    pub grf: Option<GrfOutputConfig>,

    /// Per-trial slice ranges, optional
    #[serde(default)]
    pub slices: Vec<SliceRange>,

    /// Whether slice ranges may overlap
    #[serde(default)]
    pub allow_overlapping_slices: bool,
}

/// One raw input source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Unique source name (referenced by `sync.reference_series`)
    pub name: String,

    /// Path to the raw file
    pub path: PathBuf,

    /// Source format/type tag
    pub kind: SourceKind,

    /// Nominal sample rate in Hz, must be > 0
    pub rate_hz: f64,

    /// Start offset in seconds relative to the job's common clock
    #[serde(default)]
    pub start_offset_s: f64,

    /// Length unit used by the raw file
    #[serde(default)]
    pub units: LengthUnit,
}

/// Source format/type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Visual3D-style TSV export of computed anatomical landmarks
    Landmarks,
    /// Visual3D-style TSV export of optical marker targets
    Targets,
    /// An already-written TRC file read back as a source
    Trc,
    /// Force-plate tabular export (forces, moments, optional COP)
    ForcePlate,
}

impl SourceKind {
    /// Whether this source feeds the marker pipeline (vs. the GRF pipeline)
    pub fn is_marker(self) -> bool {
        !matches!(self, SourceKind::ForcePlate)
    }
}

/// Marker output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Destination TRC path
    pub path: PathBuf,

    /// Length unit written to the file (header `Units` field)
    #[serde(default)]
    pub units: LengthUnit,

    /// Axis-convention rotation applied at emission
    #[serde(default)]
    pub rotation: AxisRotation,

    /// Camera rate for the TRC header; defaults to the data rate
    #[serde(default)]
    pub camera_rate: Option<f64>,
}

/// Axis-convention rotation between capture space and the simulation
/// toolchain's space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisRotation {
    /// Emit coordinates untouched
    AsIs,
    /// Capture Z-up to simulation Y-up: (x, y, z) -> (x, z, -y)
    #[default]
    ZUpToYUp,
}

impl AxisRotation {
    /// Apply the rotation to one 3D vector
    pub fn apply(self, v: [f64; 3]) -> [f64; 3] {
        match self {
            AxisRotation::AsIs => v,
            AxisRotation::ZUpToYUp => [v[0], v[2], -v[1]],
        }
    }
}

/// GRF output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrfOutputConfig {
    /// Destination MOT path
    pub path: PathBuf,
}

/// One per-trial slice, 1-based inclusive frame range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceRange {
    pub start_frame: usize,
    pub end_frame: usize,

    /// Label appended to the output file stem; defaults to the range
    #[serde(default)]
    pub label: Option<String>,
}

impl JobConfig {
    /// Marker-pipeline sources, in precedence order
    pub fn marker_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|s| s.kind.is_marker())
    }

    /// Force-plate sources, in precedence order
    pub fn force_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|s| !s.kind.is_marker())
    }
}
