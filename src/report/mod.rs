//! Reporting utilities: outlier aggregation and formatted terminal output.

pub mod format;

pub use format::*;

use crate::band::FilterEvaluator;

/// Every device's in-band samples as `(frequency GHz, S21 dB)` pairs.
///
/// Identical pairs across devices appear once; distinct pairs are all kept.
/// Sorted by frequency, then magnitude.
pub fn collect_outliers(devices: &[FilterEvaluator]) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = devices
        .iter()
        .flat_map(|device| device.merged_map())
        .map(|(f, db)| (f.ghz(), db))
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    points.dedup_by(|a, b| a.0.total_cmp(&b.0).is_eq() && a.1.total_cmp(&b.1).is_eq());
    points
}
