//! `info` command implementation.

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::{CliError, Result};

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    sources: Vec<SourceInfo>,
    sync: SyncInfo,
    output: OutputInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    grf_output: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    slices: Vec<SliceInfo>,
}

#[derive(Serialize)]
struct SourceInfo {
    name: String,
    kind: String,
    path: String,
    rate_hz: f64,
    start_offset_s: f64,
    units: String,
}

#[derive(Serialize)]
struct SyncInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_rate: Option<f64>,
    interpolation: String,
    max_gap_tolerance_s: f64,
    extrapolate: String,
}

#[derive(Serialize)]
struct OutputInfo {
    path: String,
    units: String,
    rotation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    camera_rate: Option<f64>,
}

#[derive(Serialize)]
struct SliceInfo {
    start_frame: usize,
    end_frame: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()));
    }

    let job = config_loader::ConfigLoader::load_from_path(&args.config)?;

    if args.json {
        let info = build_config_info(&job);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&job);
    }

    Ok(())
}

fn build_config_info(job: &contracts::JobConfig) -> ConfigInfo {
    ConfigInfo {
        sources: job
            .sources
            .iter()
            .map(|s| SourceInfo {
                name: s.name.clone(),
                kind: format!("{:?}", s.kind),
                path: s.path.display().to_string(),
                rate_hz: s.rate_hz,
                start_offset_s: s.start_offset_s,
                units: s.units.label().to_string(),
            })
            .collect(),
        sync: SyncInfo {
            reference_series: job.sync.reference_series.clone(),
            target_rate: job.sync.target_rate,
            interpolation: format!("{:?}", job.sync.interpolation),
            max_gap_tolerance_s: job.sync.max_gap_tolerance_s,
            extrapolate: format!("{:?}", job.sync.extrapolate),
        },
        output: OutputInfo {
            path: job.output.path.display().to_string(),
            units: job.output.units.label().to_string(),
            rotation: format!("{:?}", job.output.rotation),
            camera_rate: job.output.camera_rate,
        },
        grf_output: job.grf.as_ref().map(|g| g.path.display().to_string()),
        slices: job
            .slices
            .iter()
            .map(|s| SliceInfo {
                start_frame: s.start_frame,
                end_frame: s.end_frame,
                label: s.label.clone(),
            })
            .collect(),
    }
}

fn print_config_info(job: &contracts::JobConfig) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  trcsync Job Configuration                   ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📥 Sources ({})", job.sources.len());
    for (i, source) in job.sources.iter().enumerate() {
        let is_last = i == job.sources.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        println!(
            "   {} {} ({:?}, {} Hz, {}, offset {}s)",
            prefix, source.name, source.kind, source.rate_hz,
            source.units.label(), source.start_offset_s
        );
    }

    println!("\n⚙️  Sync Policy");
    match (&job.sync.reference_series, job.sync.target_rate) {
        (Some(reference), _) => println!("   ├─ Reference series: {}", reference),
        (None, Some(rate)) => println!("   ├─ Target rate: {} Hz", rate),
        (None, None) => println!("   ├─ Time base: (unset)"),
    }
    println!("   ├─ Interpolation: {:?}", job.sync.interpolation);
    println!("   ├─ Max gap tolerance: {}s", job.sync.max_gap_tolerance_s);
    println!("   └─ Extrapolate: {:?}", job.sync.extrapolate);

    println!("\n📤 Output");
    println!("   ├─ TRC: {}", job.output.path.display());
    println!("   ├─ Units: {}", job.output.units.label());
    println!("   ├─ Rotation: {:?}", job.output.rotation);
    match job.grf {
        Some(ref grf) => println!("   └─ GRF MOT: {}", grf.path.display()),
        None => println!("   └─ GRF MOT: (none)"),
    }

    if !job.slices.is_empty() {
        println!("\n✂️  Slices ({})", job.slices.len());
        for (i, slice) in job.slices.iter().enumerate() {
            let is_last = i == job.slices.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            let label = slice.label.as_deref().unwrap_or("(range)");
            println!(
                "   {} frames {}..={} -> {}",
                prefix, slice.start_frame, slice.end_frame, label
            );
        }
    }

    println!();
}
