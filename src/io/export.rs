//! Export the yield table to CSV or JSON.
//!
//! The CSV has one row per sweep cell and is meant for spreadsheets; the JSON
//! keeps the yield → cells grouping plus run metadata.

use std::fs::File;
use std::path::Path;

use chrono::Local;
use serde::Serialize;

use crate::domain::{MissingSamplePolicy, ThresholdConfig};
use crate::error::AppError;
use crate::sweep::{CellRecord, YieldTable};

#[derive(Debug, Serialize)]
struct CellRow {
    pass_low_step: usize,
    stop_high_step: usize,
    pass_low_db: f64,
    pass_high_db: f64,
    stop_low_db: f64,
    stop_high_db: f64,
    good: usize,
    total: usize,
    yield_pct: f64,
}

impl From<&CellRecord> for CellRow {
    fn from(r: &CellRecord) -> Self {
        Self {
            pass_low_step: r.pass_low_step,
            stop_high_step: r.stop_high_step,
            pass_low_db: r.thresholds.pass_low_db,
            pass_high_db: r.thresholds.pass_high_db,
            stop_low_db: r.thresholds.stop_low_db,
            stop_high_db: r.thresholds.stop_high_db,
            good: r.good,
            total: r.total,
            yield_pct: r.yield_pct.value(),
        }
    }
}

#[derive(Debug, Serialize)]
struct YieldGroup {
    yield_pct: f64,
    cells: Vec<CellRow>,
}

#[derive(Debug, Serialize)]
struct YieldReport {
    tool: String,
    generated: String,
    base: ThresholdConfig,
    missing_sample: MissingSamplePolicy,
    devices: usize,
    skipped: Vec<String>,
    yields: Vec<YieldGroup>,
}

/// Write one CSV row per cell, ascending by yield.
pub fn write_yield_csv(path: &Path, table: &YieldTable) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::output(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    for record in table.records() {
        writer
            .serialize(CellRow::from(record))
            .map_err(|e| AppError::output(format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::output(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Run metadata stored alongside the JSON yield table.
#[derive(Debug, Clone)]
pub struct ExportMeta<'a> {
    pub base: &'a ThresholdConfig,
    pub policy: MissingSamplePolicy,
    pub devices: usize,
    pub skipped: Vec<String>,
}

/// Write the grouped yield table as pretty JSON.
pub fn write_yield_json(path: &Path, table: &YieldTable, meta: ExportMeta<'_>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create export JSON '{}': {e}", path.display())))?;

    let report = YieldReport {
        tool: "fy".to_string(),
        generated: Local::now().to_rfc3339(),
        base: *meta.base,
        missing_sample: meta.policy,
        devices: meta.devices,
        skipped: meta.skipped,
        yields: table
            .iter()
            .map(|(key, cells)| YieldGroup {
                yield_pct: key.value(),
                cells: cells.iter().map(CellRow::from).collect(),
            })
            .collect(),
    };

    serde_json::to_writer_pretty(file, &report)
        .map_err(|e| AppError::output(format!("Failed to write export JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::threshold_grid;

    fn table() -> YieldTable {
        let grid = threshold_grid(&ThresholdConfig::SWEEP_BASE, 1, 2);
        let mut t = YieldTable::new();
        t.push(CellRecord::new(&grid[0], 2, 2));
        t.push(CellRecord::new(&grid[1], 1, 2));
        t
    }

    #[test]
    fn csv_has_one_row_per_cell() {
        let path = std::env::temp_dir().join(format!("fy-export-{}.csv", std::process::id()));
        write_yield_csv(&path, &table()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("pass_low_step,stop_high_step,pass_low_db"));
        // Ascending yield: the 50% cell comes first.
        assert!(lines[1].ends_with(",1,2,50.0"));
        assert!(lines[2].ends_with(",2,2,100.0"));
    }

    #[test]
    fn json_groups_cells_by_yield() {
        let path = std::env::temp_dir().join(format!("fy-export-{}.json", std::process::id()));
        let base = ThresholdConfig::SWEEP_BASE;
        let meta = ExportMeta {
            base: &base,
            policy: MissingSamplePolicy::ZeroDefault,
            devices: 2,
            skipped: vec!["broken.s2p".to_string()],
        };
        write_yield_json(&path, &table(), meta).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["tool"], "fy");
        assert_eq!(v["missing_sample"], "zero");
        assert_eq!(v["yields"].as_array().unwrap().len(), 2);
        assert_eq!(v["yields"][1]["yield_pct"], 100.0);
        assert_eq!(v["skipped"][0], "broken.s2p");
    }
}
