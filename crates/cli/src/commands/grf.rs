//! `grf` command implementation.

use std::time::Instant;

use tracing::info;

use crate::cli::GrfArgs;
use crate::error::{CliError, Result};
use crate::pipeline::{self, ConversionStats};

/// Execute the `grf` command
pub fn run_grf(args: &GrfArgs) -> Result<()> {
    info!(config = %args.config.display(), "Starting GRF conversion");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()));
    }

    let mut job = config_loader::ConfigLoader::load_from_path(&args.config)?;

    let mut grf = job
        .grf
        .take()
        .ok_or_else(|| CliError::unusable_job("no [grf] output section in configuration"))?;
    if let Some(output) = &args.output {
        grf.path = output.clone();
    }

    let source_count = job.force_sources().count();
    if source_count == 0 {
        return Err(CliError::unusable_job(
            "no force-plate sources in configuration",
        ));
    }

    let started = Instant::now();
    let table = pipeline::sync_forces(&job)?;

    let mut stats = ConversionStats::from_table(&table, source_count);
    if args.dry_run {
        info!("Dry run, skipping write");
    } else {
        writers::write_grf(&table, &grf)?;
        stats.outputs.push(grf.path.clone());
    }
    stats.duration = started.elapsed();
    stats.print_summary();

    Ok(())
}
