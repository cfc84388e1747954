//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// trcsync - motion-capture to simulation-toolchain file converter
#[derive(Parser, Debug)]
#[command(
    name = "trcsync",
    author,
    version,
    about = "Convert and synchronize motion-capture exports into strict TRC/MOT files",
    long_about = "Reads heterogeneous capture exports (Visual3D-style TSV landmark and \n\
                  marker-target files, force-plate tables, prior TRC files), aligns them \n\
                  on a common time base, merges them, and writes strict TRC marker files \n\
                  and MOT ground-reaction-force files for simulation toolchains."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TRCSYNC_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "TRCSYNC_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synchronize marker sources and write the TRC output
    Convert(ConvertArgs),

    /// Synchronize force-plate sources and write the MOT output
    Grf(GrfArgs),

    /// Cut the output (or an existing TRC file) into per-trial files
    Slice(SliceArgs),

    /// Validate a job configuration without running
    Validate(ValidateArgs),

    /// Display job configuration information
    Info(InfoArgs),
}

/// Arguments for the `convert` command
#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    /// Path to job configuration file (TOML or JSON)
    #[arg(short, long, default_value = "job.toml", env = "TRCSYNC_CONFIG")]
    pub config: PathBuf,

    /// Override the output TRC path from configuration
    #[arg(short, long, env = "TRCSYNC_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Run the pipeline but write nothing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `grf` command
#[derive(Parser, Debug, Clone)]
pub struct GrfArgs {
    /// Path to job configuration file (TOML or JSON)
    #[arg(short, long, default_value = "job.toml", env = "TRCSYNC_CONFIG")]
    pub config: PathBuf,

    /// Override the output MOT path from configuration
    #[arg(short, long, env = "TRCSYNC_GRF_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Run the pipeline but write nothing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `slice` command
#[derive(Parser, Debug, Clone)]
pub struct SliceArgs {
    /// Path to job configuration file (TOML or JSON)
    #[arg(short, long, default_value = "job.toml", env = "TRCSYNC_CONFIG")]
    pub config: PathBuf,

    /// Slice this TRC file instead of running the conversion pipeline
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to job configuration file to validate
    #[arg(short, long, default_value = "job.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to job configuration file
    #[arg(short, long, default_value = "job.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
