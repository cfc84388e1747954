//! `slice` command implementation.

use std::path::{Path, PathBuf};
use std::time::Instant;

use contracts::{AxisRotation, OutputConfig, SliceRange, SourceConfig, SourceKind, SyncPolicy, WideTable};
use sync_engine::SyncEngine;
use tracing::info;

use crate::cli::SliceArgs;
use crate::error::{CliError, Result};
use crate::pipeline::{self, ConversionStats};

/// Execute the `slice` command
///
/// With `--input` the given TRC file is cut directly; otherwise the full
/// conversion pipeline runs in memory and its result is cut, without
/// writing the unsliced file.
pub fn run_slice(args: &SliceArgs) -> Result<()> {
    info!(config = %args.config.display(), "Starting slicing");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()));
    }

    let job = config_loader::ConfigLoader::load_from_path(&args.config)?;
    if job.slices.is_empty() {
        return Err(CliError::unusable_job("no [[slices]] ranges in configuration"));
    }

    let started = Instant::now();
    let (table, emission) = match &args.input {
        Some(input) => (read_trc_table(input, &job.output.units)?, trc_passthrough(input, &job.output)),
        None => (pipeline::sync_markers(&job)?, job.output.clone()),
    };

    let slices = writers::slice_table(&table, &job.slices, job.allow_overlapping_slices)?;

    let source_count = if args.input.is_some() {
        1
    } else {
        job.marker_sources().count()
    };
    let mut stats = ConversionStats::from_table(&table, source_count);
    for (range, slice) in job.slices.iter().zip(&slices) {
        let output = OutputConfig {
            path: slice_path(&emission.path, range),
            ..emission.clone()
        };
        writers::write_trc(slice, &output)?;
        stats.outputs.push(output.path);
    }
    stats.duration = started.elapsed();
    stats.print_summary();

    Ok(())
}

/// Read an already-written TRC file back into a table on its own time base
fn read_trc_table(input: &Path, units: &contracts::LengthUnit) -> Result<WideTable> {
    let source = SourceConfig {
        name: "input".into(),
        path: input.to_path_buf(),
        kind: SourceKind::Trc,
        rate_hz: 1.0, // the TRC header is authoritative
        start_offset_s: 0.0,
        units: *units,
    };
    let series = readers::read_source(&source)?;
    let policy = SyncPolicy {
        reference_series: Some("input".into()),
        ..Default::default()
    };
    Ok(SyncEngine::new(policy).synchronize(&[series])?)
}

/// Emission settings for slices of an existing TRC
///
/// Coordinates in the file already carry the output axis convention, so
/// slices are written back without rotating a second time.
fn trc_passthrough(input: &Path, output: &OutputConfig) -> OutputConfig {
    OutputConfig {
        path: input.to_path_buf(),
        units: output.units,
        rotation: AxisRotation::AsIs,
        camera_rate: output.camera_rate,
    }
}

/// Derive the per-trial output path: `<stem>_<label>.trc`
fn slice_path(base: &Path, range: &SliceRange) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "slice".to_string());
    let label = range
        .label
        .clone()
        .unwrap_or_else(|| format!("{}_{}", range.start_frame, range.end_frame));
    base.with_file_name(format!("{stem}_{label}.trc"))
}
