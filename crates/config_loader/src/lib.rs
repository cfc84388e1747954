//! # Config Loader
//!
//! Job configuration loading and parsing.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Produce a [`JobConfig`]
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let job = ConfigLoader::load_from_path(Path::new("job.toml")).unwrap();
//! println!("Sources: {}", job.sources.len());
//! ```

mod parser;
mod validator;

pub use contracts::JobConfig;
pub use parser::ConfigFormat;

use contracts::PipelineError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file path
    ///
    /// Automatically detects format from the file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<JobConfig, PipelineError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from a string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<JobConfig, PipelineError> {
        let job = parser::parse(content, format)?;
        validator::validate(&job)?;
        Ok(job)
    }

    /// Serialize a JobConfig to a TOML string
    pub fn to_toml(job: &JobConfig) -> Result<String, PipelineError> {
        toml::to_string_pretty(job)
            .map_err(|e| PipelineError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize a JobConfig to a JSON string
    pub fn to_json(job: &JobConfig) -> Result<String, PipelineError> {
        serde_json::to_string_pretty(job)
            .map_err(|e| PipelineError::config_parse(format!("JSON serialize error: {e}")))
    }

    /// Infer configuration format from the file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, PipelineError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            PipelineError::config_parse("cannot determine config format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            PipelineError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }
}
