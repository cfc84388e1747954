//! `convert` command implementation.

use std::time::Instant;

use tracing::info;

use crate::cli::ConvertArgs;
use crate::error::{CliError, Result};
use crate::pipeline::{self, ConversionStats};

/// Execute the `convert` command
pub fn run_convert(args: &ConvertArgs) -> Result<()> {
    info!(config = %args.config.display(), "Starting marker conversion");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()));
    }

    let mut job = config_loader::ConfigLoader::load_from_path(&args.config)?;
    if let Some(output) = &args.output {
        job.output.path = output.clone();
    }

    let source_count = job.marker_sources().count();
    if source_count == 0 {
        return Err(CliError::unusable_job(
            "no marker sources in configuration (only force plates?)",
        ));
    }

    let started = Instant::now();
    let table = pipeline::sync_markers(&job)?;

    let mut stats = ConversionStats::from_table(&table, source_count);
    if args.dry_run {
        info!("Dry run, skipping write");
    } else {
        writers::write_trc(&table, &job.output)?;
        stats.outputs.push(job.output.path.clone());
    }
    stats.duration = started.elapsed();
    stats.print_summary();

    Ok(())
}
