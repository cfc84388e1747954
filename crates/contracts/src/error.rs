//! Layered error definitions
//!
//! Categorized by pipeline stage: config / source / sync / merge / write / slice

use thiserror::Error;

/// Unified error type for the conversion pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Source Errors =====
    /// Raw input violates the source format contract (shape, monotonicity,
    /// unparsable field). Identifies the offending record where possible.
    #[error("malformed source '{source_name}'{}{}: {message}",
        row.map(|r| format!(" at row {r}")).unwrap_or_default(),
        field.as_ref().map(|f| format!(", field '{f}'")).unwrap_or_default())]
    MalformedSource {
        source_name: String,
        row: Option<usize>,
        field: Option<String>,
        message: String,
    },

    // ===== Sync Errors =====
    /// Two series define the same channel label with conflicting dimensionality
    #[error("incompatible series for label '{label}': {message}")]
    IncompatibleSeries { label: String, message: String },

    // ===== Merge Errors =====
    /// Merge produced a degenerate table (zero rows or zero columns)
    #[error("empty merge result: {message}")]
    EmptyMerge { message: String },

    // ===== Writer Errors =====
    /// Header-declared counts disagree with the table body
    #[error("shape mismatch for {what}: declared {declared}, actual {actual}")]
    ShapeMismatch {
        what: String,
        declared: usize,
        actual: usize,
    },

    // ===== Slicer Errors =====
    /// A requested slice range exceeds the source frame count
    #[error("slice range [{start_frame}, {end_frame}] out of bounds (1..={num_frames})")]
    RangeOutOfBounds {
        start_frame: usize,
        end_frame: usize,
        num_frames: usize,
    },

    /// Overlapping slice ranges with overlap forbidden
    #[error("overlapping slice ranges not allowed: [{first_start}, {first_end}] and [{second_start}, {second_end}]")]
    OverlapNotAllowed {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl PipelineError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create malformed source error pointing at a specific record
    pub fn malformed_source(
        source_name: impl Into<String>,
        row: Option<usize>,
        field: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedSource {
            source_name: source_name.into(),
            row,
            field,
            message: message.into(),
        }
    }

    /// Create incompatible series error
    pub fn incompatible_series(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::IncompatibleSeries {
            label: label.into(),
            message: message.into(),
        }
    }

    /// Create empty merge error
    pub fn empty_merge(message: impl Into<String>) -> Self {
        Self::EmptyMerge {
            message: message.into(),
        }
    }

    /// Create shape mismatch error
    pub fn shape_mismatch(what: impl Into<String>, declared: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            declared,
            actual,
        }
    }
}
