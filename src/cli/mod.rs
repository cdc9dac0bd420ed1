//! Command-line parsing for the filter yield tool.
//!
//! The goal of this module is to keep **argument parsing** separate from band
//! evaluation and the sweep. `app.rs` turns these structs into
//! `domain::CheckConfig` / `domain::SweepConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    BandRange, DEFAULT_PASS_BAND, DEFAULT_STOP_LEFT, DEFAULT_STOP_RIGHT, MissingSamplePolicy, ThresholdConfig,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fy", version, about = "RF filter S2P good/bad classifier and threshold yield sweep")]
pub struct Cli {
    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify one S2P file as good or bad and show per-band detail.
    Check(CheckArgs),
    /// Sweep thresholds over every listed device and tabulate yield.
    ///
    /// Reads `all_s2p_files` and the three `*_frequencies` files from the data
    /// directory. This is the default when `fy` is run without arguments.
    Sweep(SweepArgs),
}

/// Inputs and band edges shared by both subcommands.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Directory holding the device list and check-frequency files.
    #[arg(long, env = "FY_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Pass-band edges in GHz (LOW:HIGH).
    #[arg(long, value_name = "LOW:HIGH", default_value_t = DEFAULT_PASS_BAND)]
    pub pass_band: BandRange,

    /// Left stop-band edges in GHz (LOW:HIGH).
    #[arg(long, value_name = "LOW:HIGH", default_value_t = DEFAULT_STOP_LEFT)]
    pub stop_left: BandRange,

    /// Right stop-band edges in GHz (LOW:HIGH).
    #[arg(long, value_name = "LOW:HIGH", default_value_t = DEFAULT_STOP_RIGHT)]
    pub stop_right: BandRange,

    /// How to treat a check frequency with no measured sample in its band.
    #[arg(long, value_enum, default_value_t = MissingSamplePolicy::ZeroDefault)]
    pub missing_sample: MissingSamplePolicy,

    /// Do not write SVG plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Directory for SVG plots (default: next to each network file).
    #[arg(long)]
    pub plot_dir: Option<PathBuf>,
}

/// Options for `fy check`.
#[derive(Debug, Args, Clone)]
pub struct CheckArgs {
    /// Touchstone 2-port file to classify.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Pass-band lower bound (dB, exclusive).
    #[arg(long, allow_hyphen_values = true, default_value_t = ThresholdConfig::CHECK_DEFAULT.pass_low_db)]
    pub pass_low: f64,

    /// Pass-band upper bound (dB, exclusive).
    #[arg(long, allow_hyphen_values = true, default_value_t = ThresholdConfig::CHECK_DEFAULT.pass_high_db)]
    pub pass_high: f64,

    /// Stop-band lower bound (dB, exclusive).
    #[arg(long, allow_hyphen_values = true, default_value_t = ThresholdConfig::CHECK_DEFAULT.stop_low_db)]
    pub stop_low: f64,

    /// Stop-band upper bound (dB, exclusive).
    #[arg(long, allow_hyphen_values = true, default_value_t = ThresholdConfig::CHECK_DEFAULT.stop_high_db)]
    pub stop_high: f64,
}

/// Options for `fy sweep`.
#[derive(Debug, Args, Clone)]
pub struct SweepArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Device list (default: `<data-dir>/all_s2p_files`).
    #[arg(long)]
    pub device_list: Option<PathBuf>,

    /// Base pass-band lower bound (dB); relaxed by 1 dB per step.
    #[arg(long, allow_hyphen_values = true, default_value_t = ThresholdConfig::SWEEP_BASE.pass_low_db)]
    pub pass_low: f64,

    /// Pass-band upper bound (dB); fixed during the sweep.
    #[arg(long, allow_hyphen_values = true, default_value_t = ThresholdConfig::SWEEP_BASE.pass_high_db)]
    pub pass_high: f64,

    /// Stop-band lower bound (dB); fixed during the sweep.
    #[arg(long, allow_hyphen_values = true, default_value_t = ThresholdConfig::SWEEP_BASE.stop_low_db)]
    pub stop_low: f64,

    /// Base stop-band upper bound (dB); tightened by 1 dB per step.
    #[arg(long, allow_hyphen_values = true, default_value_t = ThresholdConfig::SWEEP_BASE.stop_high_db)]
    pub stop_high: f64,

    /// Number of pass-band lower-bound steps.
    #[arg(long, default_value_t = 20)]
    pub pass_low_steps: usize,

    /// Number of stop-band upper-bound steps.
    #[arg(long, default_value_t = 20)]
    pub stop_high_steps: usize,

    /// Abort on the first network file that fails to load instead of skipping it.
    #[arg(long)]
    pub fail_fast: bool,

    /// Render the outlier cloud as an ASCII scatter in the terminal.
    #[arg(long)]
    pub ascii: bool,

    /// ASCII plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// ASCII plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the yield table to CSV (one row per cell).
    #[arg(long)]
    pub export_csv: Option<PathBuf>,

    /// Export the yield table and run metadata to JSON.
    #[arg(long)]
    pub export_json: Option<PathBuf>,
}
