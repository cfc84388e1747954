//! `validate` command implementation.

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::error::{CliError, Result};

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    source_count: usize,
    marker_source_count: usize,
    force_source_count: usize,
    slice_count: usize,
    output: String,
    grf_output: Option<String>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        Err(CliError::unusable_job("configuration validation failed"))
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(job) => {
            let warnings = collect_warnings(&job);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    source_count: job.sources.len(),
                    marker_source_count: job.marker_sources().count(),
                    force_source_count: job.force_sources().count(),
                    slice_count: job.slices.len(),
                    output: job.output.path.display().to_string(),
                    grf_output: job.grf.as_ref().map(|g| g.path.display().to_string()),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(job: &contracts::JobConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    for source in &job.sources {
        if !source.path.exists() {
            warnings.push(format!(
                "Source '{}' file does not exist yet: {}",
                source.name,
                source.path.display()
            ));
        }
    }

    if job.sync.extrapolate == contracts::Extrapolate::Clamp {
        warnings.push(
            "extrapolate = clamp will hold boundary samples outside native coverage".to_string(),
        );
    }

    if job.allow_overlapping_slices && job.slices.len() > 1 {
        warnings.push("overlapping slice ranges are permitted".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Sources: {}", summary.source_count);
            println!("  Marker sources: {}", summary.marker_source_count);
            println!("  Force sources: {}", summary.force_source_count);
            println!("  Slices: {}", summary.slice_count);
            println!("  Output: {}", summary.output);
            if let Some(ref grf) = summary.grf_output {
                println!("  GRF output: {}", grf);
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
