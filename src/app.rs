//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initializes logging
//! - runs the check or sweep pipeline
//! - prints reports, writes plots and optional exports

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::band::BandPlan;
use crate::cli::{CheckArgs, Command, CommonArgs, SweepArgs};
use crate::domain::{Band, BandLayout, BandRole, CheckConfig, ResponseCurve, SweepConfig, ThresholdConfig};
use crate::error::AppError;
use crate::io::{DEVICE_LIST_FILE, ExportMeta, TouchstoneLoader};

pub mod pipeline;

/// Entry point for the `fy` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `fy` alone runs the sweep and `fy FILE` checks one file. Clap requires a
    // subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    crate::logging::init_logging(&cli.log_level)?;

    match cli.command {
        Command::Check(args) => handle_check(&args),
        Command::Sweep(args) => handle_sweep(&args),
    }
}

fn handle_check(args: &CheckArgs) -> Result<(), AppError> {
    let config = check_config_from_args(args);
    let out = pipeline::run_check(&config, &TouchstoneLoader)?;

    println!("{}", crate::report::format_device_verdict(&out.verdict, &out.plan));

    if config.plot {
        let dest = plot_path(&config.device, config.plot_dir.as_deref());
        plot_device(out.device.curve(), &plan_bands(&out.plan), out.device.device(), &dest);
    }
    Ok(())
}

fn handle_sweep(args: &SweepArgs) -> Result<(), AppError> {
    let config = sweep_config_from_args(args);
    let out = pipeline::run_sweep(&config, &TouchstoneLoader)?;

    println!(
        "{}",
        crate::report::format_sweep_summary(&config, &out.plan, out.devices.len(), &out.skipped)
    );
    print!("{}", crate::report::format_yield_table(&out.table));

    let bands = plan_bands(&out.plan);
    if config.plot {
        for device in &out.devices {
            let source = config.data_dir.join(device.device());
            let dest = plot_path(&source, config.plot_dir.as_deref());
            plot_device(device.curve(), &bands, device.device(), &dest);
        }
        let dest = config
            .plot_dir
            .as_deref()
            .unwrap_or(config.data_dir.as_path())
            .join("all.svg");
        if let Err(err) = crate::plot::plot_scatter(&out.outliers, &bands, "all devices", &dest) {
            tracing::warn!(error = %err, "scatter plot failed");
        }
    }

    if config.ascii {
        println!();
        print!(
            "{}",
            crate::plot::render_scatter(&out.outliers, &bands, config.plot_width, config.plot_height)
        );
    }

    if let Some(path) = &config.export_csv {
        crate::io::write_yield_csv(path, &out.table)?;
        tracing::info!(path = %path.display(), "yield table exported");
    }
    if let Some(path) = &config.export_json {
        let meta = ExportMeta {
            base: &config.base,
            policy: config.policy,
            devices: out.devices.len(),
            skipped: out.skipped.iter().map(|s| s.label.clone()).collect(),
        };
        crate::io::write_yield_json(path, &out.table, meta)?;
        tracing::info!(path = %path.display(), "yield report exported");
    }

    Ok(())
}

fn plan_bands(plan: &BandPlan) -> Vec<Band> {
    BandRole::ALL.iter().map(|&role| plan.spec(role).band).collect()
}

/// Plot failures never change a verdict; they are logged and skipped.
fn plot_device(curve: &ResponseCurve, bands: &[Band], title: &str, dest: &Path) {
    match crate::plot::plot_curve(curve, bands, title, dest) {
        Ok(()) => tracing::debug!(path = %dest.display(), "curve plot written"),
        Err(err) => tracing::warn!(device = title, error = %err, "curve plot failed"),
    }
}

/// `<stem>.svg` next to the network file, or inside `plot_dir` when given.
fn plot_path(network: &Path, plot_dir: Option<&Path>) -> PathBuf {
    let file = network.with_extension("svg");
    match (plot_dir, file.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => file,
    }
}

fn band_layout(common: &CommonArgs) -> BandLayout {
    BandLayout {
        pass: common.pass_band,
        stop_left: common.stop_left,
        stop_right: common.stop_right,
    }
}

pub fn check_config_from_args(args: &CheckArgs) -> CheckConfig {
    CheckConfig {
        device: args.file.clone(),
        data_dir: args.common.data_dir.clone(),
        bands: band_layout(&args.common),
        thresholds: ThresholdConfig {
            pass_low_db: args.pass_low,
            pass_high_db: args.pass_high,
            stop_low_db: args.stop_low,
            stop_high_db: args.stop_high,
        },
        policy: args.common.missing_sample,
        plot: !args.common.no_plot,
        plot_dir: args.common.plot_dir.clone(),
    }
}

pub fn sweep_config_from_args(args: &SweepArgs) -> SweepConfig {
    let data_dir = args.common.data_dir.clone();
    SweepConfig {
        device_list: args
            .device_list
            .clone()
            .unwrap_or_else(|| data_dir.join(DEVICE_LIST_FILE)),
        data_dir,
        bands: band_layout(&args.common),
        base: ThresholdConfig {
            pass_low_db: args.pass_low,
            pass_high_db: args.pass_high,
            stop_low_db: args.stop_low,
            stop_high_db: args.stop_high,
        },
        pass_low_steps: args.pass_low_steps,
        stop_high_steps: args.stop_high_steps,
        policy: args.common.missing_sample,
        fail_fast: args.fail_fast,

        plot: !args.common.no_plot,
        plot_dir: args.common.plot_dir.clone(),
        ascii: args.ascii,
        plot_width: args.width,
        plot_height: args.height,

        export_csv: args.export_csv.clone(),
        export_json: args.export_json.clone(),
    }
}

/// Rewrite argv so `fy` defaults to `fy sweep` and `fy FILE` to `fy check FILE`.
///
/// Rules:
/// - `fy`                      -> `fy sweep`
/// - `fy FILE ...`             -> `fy check FILE ...`
/// - `fy --ascii ...`          -> `fy sweep --ascii ...`
/// - `fy --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("sweep".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "check" | "sweep");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "sweep".to_string());
        return argv;
    }

    // A bare positional is a network file.
    argv.insert(1, "check".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_run_the_sweep() {
        assert_eq!(rewrite_args(argv(&["fy"])), argv(&["fy", "sweep"]));
        assert_eq!(rewrite_args(argv(&["fy", "--ascii"])), argv(&["fy", "sweep", "--ascii"]));
    }

    #[test]
    fn bare_file_runs_check() {
        assert_eq!(
            rewrite_args(argv(&["fy", "dut.s2p", "--pass-low", "-30"])),
            argv(&["fy", "check", "dut.s2p", "--pass-low", "-30"])
        );
    }

    #[test]
    fn subcommands_and_help_are_unchanged() {
        let cases: [&[&str]; 4] = [&["fy", "check", "a.s2p"], &["fy", "sweep"], &["fy", "--help"], &["fy", "-V"]];
        for args in cases {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }

    #[test]
    fn sweep_config_defaults_device_list_into_data_dir() {
        let cli = crate::cli::Cli::parse_from(rewrite_args(argv(&["fy", "--data-dir", "lot7"])));
        let Command::Sweep(args) = cli.command else {
            panic!("expected sweep");
        };
        let config = sweep_config_from_args(&args);
        assert_eq!(config.device_list, PathBuf::from("lot7").join("all_s2p_files"));
        assert_eq!(config.base, ThresholdConfig::SWEEP_BASE);
        assert!(config.plot);
    }

    #[test]
    fn plot_path_honours_plot_dir() {
        assert_eq!(plot_path(Path::new("data/a.s2p"), None), PathBuf::from("data/a.svg"));
        assert_eq!(
            plot_path(Path::new("data/a.s2p"), Some(Path::new("plots"))),
            PathBuf::from("plots/a.svg")
        );
    }
}
