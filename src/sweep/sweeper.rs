//! Yield sweep across the threshold grid.
//!
//! Every `(device, cell)` evaluation is independent and reads only immutable
//! device data, so cells are spread across rayon workers. Each worker folds its
//! cells into a local `YieldTable`; the partial tables are merged in grid order,
//! so the output is identical to a sequential run.

use rayon::prelude::*;

use crate::band::FilterEvaluator;
use crate::domain::ThresholdConfig;
use crate::error::{AppError, ErrorKind};
use crate::sweep::grid::{SweepCell, threshold_grid};
use crate::sweep::table::{CellRecord, YieldTable};

/// Evaluate all devices over `pass_low_steps × stop_high_steps` cells.
pub fn sweep(
    devices: &[FilterEvaluator],
    base: &ThresholdConfig,
    pass_low_steps: usize,
    stop_high_steps: usize,
) -> Result<YieldTable, AppError> {
    if devices.is_empty() {
        return Err(AppError::new(ErrorKind::NoDevices, "No devices to sweep."));
    }
    base.validate()?;

    let grid = threshold_grid(base, pass_low_steps, stop_high_steps);
    tracing::info!(
        devices = devices.len(),
        cells = grid.len(),
        pass_low_steps,
        stop_high_steps,
        "starting yield sweep"
    );

    let table = grid
        .par_iter()
        .map(|cell| evaluate_cell(devices, cell))
        .fold(YieldTable::new, |mut table, record| {
            table.push(record);
            table
        })
        .reduce(YieldTable::new, YieldTable::merge);

    tracing::info!(
        distinct_yields = table.len(),
        cells = table.cell_count(),
        "yield sweep finished"
    );
    Ok(table)
}

/// Count the good devices in one cell.
pub fn evaluate_cell(devices: &[FilterEvaluator], cell: &SweepCell) -> CellRecord {
    let good = devices.iter().filter(|d| d.is_good(&cell.thresholds)).count();
    let record = CellRecord::new(cell, good, devices.len());
    tracing::debug!(
        pass_low_db = cell.thresholds.pass_low_db,
        stop_high_db = cell.thresholds.stop_high_db,
        good,
        total = devices.len(),
        yield_pct = record.yield_pct.value(),
        "sweep cell"
    );
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::band::BandPlan;
    use crate::domain::{BandLayout, CheckFrequencySet, MissingSamplePolicy, ResponseCurve, Sample};

    fn plan() -> BandPlan {
        let set = |f: &[f64]| f.iter().copied().collect::<CheckFrequencySet>();
        BandPlan::new(&BandLayout::default(), set(&[6.3, 6.5]), set(&[5.5]), set(&[7.4])).unwrap()
    }

    fn device(name: &str, points: &[(f64, f64)]) -> FilterEvaluator {
        let curve = ResponseCurve::new(points.iter().map(|&(f, db)| Sample::new(f, db)).collect()).unwrap();
        FilterEvaluator::new(name, curve, &plan(), MissingSamplePolicy::ZeroDefault)
    }

    fn good_device() -> FilterEvaluator {
        device("good.s2p", &[(6.3, -1.0), (6.5, -1.0), (5.5, -120.0), (7.4, -120.0)])
    }

    fn bad_device() -> FilterEvaluator {
        // Stop-band leaks far above any swept stop threshold.
        device("bad.s2p", &[(6.3, -1.0), (6.5, -1.0), (5.5, -2.0), (7.4, -120.0)])
    }

    #[test]
    fn two_device_yields_stay_in_range() {
        let devices = vec![good_device(), bad_device()];
        let table = sweep(&devices, &ThresholdConfig::SWEEP_BASE, 20, 20).unwrap();

        assert_eq!(table.cell_count(), 400);
        for (key, _) in table.iter() {
            let y = key.value();
            assert!(y == 0.0 || y == 50.0 || y == 100.0, "unexpected yield {y}");
        }
        assert_eq!(table.get(50.0).unwrap().len(), 400);
    }

    #[test]
    fn sweep_matches_sequential_order() {
        let devices = vec![good_device(), bad_device()];
        let table = sweep(&devices, &ThresholdConfig::SWEEP_BASE, 4, 5).unwrap();
        let cells = table.get(50.0).unwrap();
        let order: Vec<(usize, usize)> = cells.iter().map(|c| (c.pass_low_step, c.stop_high_step)).collect();
        let expected: Vec<(usize, usize)> = (0..4).flat_map(|i| (0..5).map(move |j| (i, j))).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn tightening_stop_threshold_drops_yield() {
        // Stop-band sits at -35 dB: passes at -30, fails from -35 onwards.
        let marginal = device("marginal.s2p", &[(6.3, -1.0), (6.5, -1.0), (5.5, -35.0), (7.4, -120.0)]);
        let devices = vec![good_device(), marginal];
        let table = sweep(&devices, &ThresholdConfig::SWEEP_BASE, 1, 10).unwrap();

        let full = table.get(100.0).unwrap();
        let half = table.get(50.0).unwrap();
        assert_eq!(full.len(), 5);
        assert_eq!(half.len(), 5);
        assert!(full.iter().all(|c| c.thresholds.stop_high_db > -35.0));
        assert!(half.iter().all(|c| c.thresholds.stop_high_db <= -35.0));
    }

    #[test]
    fn no_devices_is_an_error() {
        let err = sweep(&[], &ThresholdConfig::SWEEP_BASE, 2, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoDevices);
    }

    #[test]
    fn zero_steps_produce_empty_table() {
        let table = sweep(&[good_device()], &ThresholdConfig::SWEEP_BASE, 0, 3).unwrap();
        assert!(table.is_empty());
    }
}
