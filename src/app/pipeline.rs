//! Shared check/sweep workflow, independent of terminal presentation.
//!
//! check: frequency files -> band plan -> load one network -> evaluate
//! sweep: frequency files -> band plan -> device list -> load networks -> sweep -> outliers
//!
//! `app.rs` only prints, plots and exports what these functions return.

use std::path::Path;

use rayon::prelude::*;

use crate::band::{BandPlan, DeviceVerdict, FilterEvaluator};
use crate::domain::{BandLayout, BandRole, CheckConfig, MissingSamplePolicy, SkippedDevice, SweepConfig};
use crate::error::{AppError, ErrorKind};
use crate::io::{DeviceEntry, NetworkLoader, read_check_frequencies, read_device_list};
use crate::sweep::YieldTable;

/// Devices that loaded, plus the ones that were left out.
#[derive(Debug, Clone)]
pub struct LoadedDevices {
    pub devices: Vec<FilterEvaluator>,
    pub skipped: Vec<SkippedDevice>,
}

/// All computed outputs of a single `fy sweep` run.
#[derive(Debug, Clone)]
pub struct SweepOutput {
    pub plan: BandPlan,
    pub devices: Vec<FilterEvaluator>,
    pub skipped: Vec<SkippedDevice>,
    pub table: YieldTable,
    pub outliers: Vec<(f64, f64)>,
}

/// Outputs of `fy check`.
#[derive(Debug, Clone)]
pub struct CheckOutput {
    pub plan: BandPlan,
    pub device: FilterEvaluator,
    pub verdict: DeviceVerdict,
}

/// Read the three check-frequency files from `data_dir` and build the band plan.
pub fn load_plan(data_dir: &Path, layout: &BandLayout) -> Result<BandPlan, AppError> {
    let read = |role: BandRole| {
        let path = data_dir.join(role.frequency_file_name());
        let set = read_check_frequencies(&path)?;
        tracing::debug!(band = role.label(), path = %path.display(), checks = set.len(), "check frequencies loaded");
        Ok::<_, AppError>(set)
    };

    BandPlan::new(
        layout,
        read(BandRole::Pass)?,
        read(BandRole::StopLeft)?,
        read(BandRole::StopRight)?,
    )
}

/// Load every listed network and bind it to the plan.
///
/// Files are read in parallel; the result keeps list order. A file that fails to
/// load is skipped with a warning, or aborts the run when `fail_fast` is set.
pub fn load_devices(
    entries: &[DeviceEntry],
    loader: &dyn NetworkLoader,
    plan: &BandPlan,
    policy: MissingSamplePolicy,
    fail_fast: bool,
) -> Result<LoadedDevices, AppError> {
    let results: Vec<_> = entries
        .par_iter()
        .map(|entry| (entry, loader.load(&entry.path)))
        .collect();

    let mut devices = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();
    for (entry, result) in results {
        match result {
            Ok(curve) => {
                tracing::debug!(device = %entry.label, samples = curve.len(), "network loaded");
                devices.push(FilterEvaluator::new(entry.label.clone(), curve, plan, policy));
            }
            Err(err) if fail_fast => return Err(err),
            Err(err) => {
                tracing::warn!(device = %entry.label, error = %err, "skipping device");
                skipped.push(SkippedDevice {
                    label: entry.label.clone(),
                    reason: err.message().to_string(),
                });
            }
        }
    }

    Ok(LoadedDevices { devices, skipped })
}

/// Execute the full sweep: plan, devices, yield table and outlier cloud.
pub fn run_sweep(config: &SweepConfig, loader: &dyn NetworkLoader) -> Result<SweepOutput, AppError> {
    config.base.validate()?;
    let plan = load_plan(&config.data_dir, &config.bands)?;

    let entries = read_device_list(&config.device_list, &config.data_dir)?;
    tracing::info!(listed = entries.len(), path = %config.device_list.display(), "device list read");
    if entries.is_empty() {
        return Err(AppError::new(
            ErrorKind::NoDevices,
            format!("Device list '{}' names no files.", config.device_list.display()),
        ));
    }

    let LoadedDevices { devices, skipped } =
        load_devices(&entries, loader, &plan, config.policy, config.fail_fast)?;
    if devices.is_empty() {
        return Err(AppError::new(
            ErrorKind::NoDevices,
            format!("None of the {} listed devices could be loaded.", entries.len()),
        ));
    }

    let table = crate::sweep::sweep(&devices, &config.base, config.pass_low_steps, config.stop_high_steps)?;
    let outliers = crate::report::collect_outliers(&devices);

    Ok(SweepOutput {
        plan,
        devices,
        skipped,
        table,
        outliers,
    })
}

/// Evaluate one network against the configured thresholds.
pub fn run_check(config: &CheckConfig, loader: &dyn NetworkLoader) -> Result<CheckOutput, AppError> {
    config.thresholds.validate()?;
    let plan = load_plan(&config.data_dir, &config.bands)?;

    let curve = loader.load(&config.device)?;
    let label = config.device.display().to_string();
    let device = FilterEvaluator::new(label, curve, &plan, config.policy);
    let verdict = device.evaluate(&config.thresholds);

    Ok(CheckOutput { plan, device, verdict })
}
