//! Threshold grid generation.
//!
//! The sweep relaxes the pass-band lower bound and tightens the stop-band upper
//! bound in whole-dB steps from a base configuration. The other two bounds stay
//! fixed.

use crate::domain::ThresholdConfig;

/// One point of the sweep grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepCell {
    pub pass_low_step: usize,
    pub stop_high_step: usize,
    pub thresholds: ThresholdConfig,
}

/// Cells in row-major order: `pass_low_step` outer, `stop_high_step` inner.
pub fn threshold_grid(base: &ThresholdConfig, pass_low_steps: usize, stop_high_steps: usize) -> Vec<SweepCell> {
    let mut out = Vec::with_capacity(pass_low_steps.saturating_mul(stop_high_steps));
    for i in 0..pass_low_steps {
        for j in 0..stop_high_steps {
            out.push(SweepCell {
                pass_low_step: i,
                stop_high_step: j,
                thresholds: ThresholdConfig {
                    pass_low_db: base.pass_low_db - i as f64,
                    stop_high_db: base.stop_high_db - j as f64,
                    ..*base
                },
            });
        }
    }
    out
}
