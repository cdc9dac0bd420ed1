//! Yield table: yield percentage → every cell that produced it.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::ThresholdConfig;
use crate::sweep::grid::SweepCell;

/// Yield percentage with a total order, for use as a map key.
#[derive(Debug, Clone, Copy)]
pub struct YieldPercent(f64);

impl YieldPercent {
    /// `100 × good / total`. `total` must be non-zero.
    pub fn from_counts(good: usize, total: usize) -> Self {
        Self(100.0 * good as f64 / total as f64)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for YieldPercent {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for YieldPercent {}

impl PartialOrd for YieldPercent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for YieldPercent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for YieldPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Outcome of one sweep cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRecord {
    pub pass_low_step: usize,
    pub stop_high_step: usize,
    pub thresholds: ThresholdConfig,
    pub good: usize,
    pub total: usize,
    pub yield_pct: YieldPercent,
}

impl CellRecord {
    pub fn new(cell: &SweepCell, good: usize, total: usize) -> Self {
        Self {
            pass_low_step: cell.pass_low_step,
            stop_high_step: cell.stop_high_step,
            thresholds: cell.thresholds,
            good,
            total,
            yield_pct: YieldPercent::from_counts(good, total),
        }
    }
}

impl fmt::Display for CellRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.thresholds;
        write!(
            f,
            "PASS_BAND {} to {} dB | STOP_BAND {} to {} dB | devices={} good={} yield={}%",
            t.pass_high_db, t.pass_low_db, t.stop_high_db, t.stop_low_db, self.total, self.good, self.yield_pct
        )
    }
}

/// Append-only multimap from yield to the cells that produced it.
///
/// Cells sharing a yield are kept in insertion order; none is overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YieldTable {
    entries: BTreeMap<YieldPercent, Vec<CellRecord>>,
}

impl YieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: CellRecord) {
        self.entries.entry(record.yield_pct).or_default().push(record);
    }

    /// Append every record of `other` after this table's records.
    pub fn merge(mut self, other: YieldTable) -> Self {
        for (key, records) in other.entries {
            self.entries.entry(key).or_default().extend(records);
        }
        self
    }

    /// Yields in ascending order with their cells.
    pub fn iter(&self) -> impl Iterator<Item = (YieldPercent, &[CellRecord])> {
        self.entries.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// All cells, ascending by yield.
    pub fn records(&self) -> impl Iterator<Item = &CellRecord> {
        self.entries.values().flatten()
    }

    pub fn get(&self, yield_pct: f64) -> Option<&[CellRecord]> {
        self.entries.get(&YieldPercent(yield_pct)).map(Vec::as_slice)
    }

    /// Number of distinct yield values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of cells across all yields.
    pub fn cell_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::grid::threshold_grid;

    #[test]
    fn identical_yields_keep_every_description() {
        let grid = threshold_grid(&ThresholdConfig::SWEEP_BASE, 1, 3);
        let mut table = YieldTable::new();
        for cell in &grid {
            table.push(CellRecord::new(cell, 1, 2));
        }
        assert_eq!(table.len(), 1);
        let cells = table.get(50.0).unwrap();
        assert_eq!(cells.len(), 3);
        let steps: Vec<usize> = cells.iter().map(|c| c.stop_high_step).collect();
        assert_eq!(steps, vec![0, 1, 2]);
    }

    #[test]
    fn keys_iterate_ascending() {
        let grid = threshold_grid(&ThresholdConfig::SWEEP_BASE, 1, 3);
        let mut table = YieldTable::new();
        table.push(CellRecord::new(&grid[0], 3, 4));
        table.push(CellRecord::new(&grid[1], 0, 4));
        table.push(CellRecord::new(&grid[2], 1, 4));
        let keys: Vec<f64> = table.iter().map(|(k, _)| k.value()).collect();
        assert_eq!(keys, vec![0.0, 25.0, 75.0]);
    }

    #[test]
    fn merge_appends_rather_than_overwrites() {
        let grid = threshold_grid(&ThresholdConfig::SWEEP_BASE, 2, 1);
        let mut a = YieldTable::new();
        a.push(CellRecord::new(&grid[0], 2, 2));
        let mut b = YieldTable::new();
        b.push(CellRecord::new(&grid[1], 2, 2));

        let merged = a.merge(b);
        let cells = merged.get(100.0).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].pass_low_step, 0);
        assert_eq!(cells[1].pass_low_step, 1);
    }

    #[test]
    fn description_names_both_windows() {
        let grid = threshold_grid(&ThresholdConfig::SWEEP_BASE, 1, 1);
        let record = CellRecord::new(&grid[0], 1, 3);
        assert_eq!(
            record.to_string(),
            "PASS_BAND 0 to -20 dB | STOP_BAND -30 to -200 dB | devices=3 good=1 yield=33.33%"
        );
    }
}
