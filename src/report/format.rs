//! Terminal formatting for check verdicts and sweep results.
//!
//! Formatting lives here so the band and sweep code stays free of presentation
//! and output changes stay localized (the golden tests below pin the layout).

use crate::band::{BandPlan, DeviceVerdict, MagnitudeSource, Violation};
use crate::domain::{Band, BandRole, SkippedDevice, SweepConfig};
use crate::sweep::YieldTable;

/// Format the single-device verdict with per-band detail.
pub fn format_device_verdict(verdict: &DeviceVerdict, plan: &BandPlan) -> String {
    let mut out = String::new();

    out.push_str("=== fy - filter check ===\n");
    out.push_str(&format!("Device: {}\n", verdict.device));
    out.push_str(&format!(
        "Thresholds: PASS_BAND {} | STOP_BAND {}\n",
        verdict.thresholds.pass_window(),
        verdict.thresholds.stop_window()
    ));
    out.push('\n');

    push_line(&mut out, &format!("{:<16} {:<12} {:>7}  {}", "band", "range_ghz", "checks", "result"));
    push_line(&mut out, &format!("{:-<16} {:-<12} {:-<7}  {:-<6}", "", "", "", ""));
    for (role, band_verdict) in &verdict.bands {
        let spec = plan.spec(*role);
        let result = match &band_verdict.violation {
            Some(v) => format!("FAIL at {}", fmt_violation(v)),
            None => "ok".to_string(),
        };
        push_line(
            &mut out,
            &format!(
                "{:<16} {:<12} {:>7}  {}",
                role.label(),
                fmt_range(&spec.band),
                format!("{}/{}", band_verdict.checked, spec.checks.len()),
                result
            ),
        );
    }

    out.push('\n');
    out.push_str(if verdict.good { "Verdict: good\n" } else { "Verdict: bad\n" });
    out
}

/// Format the run header of a sweep: devices, bands, grid, skipped files.
pub fn format_sweep_summary(
    config: &SweepConfig,
    plan: &BandPlan,
    devices: usize,
    skipped: &[SkippedDevice],
) -> String {
    let mut out = String::new();

    out.push_str("=== fy - filter yield sweep ===\n");
    out.push_str(&format!("Device list: {}\n", config.device_list.display()));
    out.push_str(&format!("Devices: loaded={devices} | skipped={}\n", skipped.len()));
    out.push_str(&format!("Missing samples: {}\n", config.policy.name()));
    out.push_str(&format!(
        "Grid: {} x {} cells | pass low from {} dB | stop high from {} dB\n",
        config.pass_low_steps, config.stop_high_steps, config.base.pass_low_db, config.base.stop_high_db
    ));
    out.push('\n');

    push_line(&mut out, &format!("{:<16} {:<12} {:>7}", "band", "range_ghz", "checks"));
    push_line(&mut out, &format!("{:-<16} {:-<12} {:-<7}", "", "", ""));
    for role in BandRole::ALL {
        let spec = plan.spec(role);
        push_line(
            &mut out,
            &format!(
                "{:<16} {:<12} {:>7}",
                role.label(),
                fmt_range(&spec.band),
                spec.checks.len()
            ),
        );
    }

    if !skipped.is_empty() {
        out.push_str("\nSkipped devices:\n");
        for s in skipped {
            out.push_str(&format!("- {}: {}\n", truncate(&s.label, 48), s.reason));
        }
    }
    out.push('\n');

    out
}

/// Format the yield table ascending by yield, every cell listed under its yield.
pub fn format_yield_table(table: &YieldTable) -> String {
    if table.is_empty() {
        return "No sweep cells evaluated.\n".to_string();
    }

    let mut out = String::new();
    for (i, (yield_pct, cells)) in table.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("Yield={yield_pct}%\n"));
        for cell in cells {
            out.push_str(&format!("    {cell}\n"));
        }
    }
    out
}

fn fmt_violation(v: &Violation) -> String {
    let source = match v.source {
        MagnitudeSource::Measured => "measured",
        MagnitudeSource::ZeroDefault => "no sample, 0 dB assumed",
        MagnitudeSource::Interpolated => "interpolated",
        MagnitudeSource::Uncovered => "no sample",
    };
    match v.magnitude_db {
        Some(db) => format!("{} GHz: {db:.2} dB ({source})", v.frequency),
        None => format!("{} GHz ({source})", v.frequency),
    }
}

fn fmt_range(band: &Band) -> String {
    format!("{}-{}", band.low, band.high)
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
