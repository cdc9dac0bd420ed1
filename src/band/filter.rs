//! Whole-filter evaluation: pass-band plus both stop-bands.

use std::sync::Arc;

use crate::band::evaluator::{BandCheck, BandVerdict};
use crate::band::extractor::FrequencyMagnitudeMap;
use crate::domain::{Band, BandLayout, BandRole, CheckFrequencySet, MissingSamplePolicy, ResponseCurve, ThresholdConfig};
use crate::error::AppError;

/// One band definition plus the frequencies it is checked at.
#[derive(Debug, Clone)]
pub struct BandSpec {
    pub band: Band,
    pub checks: Arc<CheckFrequencySet>,
}

/// The deployment's filter mask, shared by every device in a run.
#[derive(Debug, Clone)]
pub struct BandPlan {
    pub pass: BandSpec,
    pub stop_left: BandSpec,
    pub stop_right: BandSpec,
}

impl BandPlan {
    pub fn new(
        layout: &BandLayout,
        pass: CheckFrequencySet,
        stop_left: CheckFrequencySet,
        stop_right: CheckFrequencySet,
    ) -> Result<Self, AppError> {
        let spec = |role: BandRole, checks: CheckFrequencySet| -> Result<BandSpec, AppError> {
            let band = Band::new(role, layout.range(role))?;
            if checks.is_empty() {
                tracing::warn!(
                    band = role.label(),
                    "no check frequencies configured; this band will always pass"
                );
            }
            Ok(BandSpec {
                band,
                checks: Arc::new(checks),
            })
        };

        Ok(Self {
            pass: spec(BandRole::Pass, pass)?,
            stop_left: spec(BandRole::StopLeft, stop_left)?,
            stop_right: spec(BandRole::StopRight, stop_right)?,
        })
    }

    pub fn spec(&self, role: BandRole) -> &BandSpec {
        match role {
            BandRole::Pass => &self.pass,
            BandRole::StopLeft => &self.stop_left,
            BandRole::StopRight => &self.stop_right,
        }
    }
}

/// Per-device result for one threshold configuration.
#[derive(Debug, Clone)]
pub struct DeviceVerdict {
    pub device: String,
    pub thresholds: ThresholdConfig,
    pub bands: Vec<(BandRole, BandVerdict)>,
    pub good: bool,
}

/// A device's curve bound to the band plan.
#[derive(Debug, Clone)]
pub struct FilterEvaluator {
    device: String,
    curve: ResponseCurve,
    pass: BandCheck,
    stop_left: BandCheck,
    stop_right: BandCheck,
    policy: MissingSamplePolicy,
}

impl FilterEvaluator {
    pub fn new(
        device: impl Into<String>,
        curve: ResponseCurve,
        plan: &BandPlan,
        policy: MissingSamplePolicy,
    ) -> Self {
        let check = |spec: &BandSpec| BandCheck::new(&curve, spec.band, Arc::clone(&spec.checks));
        let pass = check(&plan.pass);
        let stop_left = check(&plan.stop_left);
        let stop_right = check(&plan.stop_right);
        Self {
            device: device.into(),
            curve,
            pass,
            stop_left,
            stop_right,
            policy,
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn curve(&self) -> &ResponseCurve {
        &self.curve
    }

    pub fn band(&self, role: BandRole) -> &BandCheck {
        match role {
            BandRole::Pass => &self.pass,
            BandRole::StopLeft => &self.stop_left,
            BandRole::StopRight => &self.stop_right,
        }
    }

    /// True iff all three bands pass. Stops at the first failing band.
    pub fn is_good(&self, thresholds: &ThresholdConfig) -> bool {
        let good = BandRole::ALL.iter().all(|&role| self.band_passes(role, thresholds));
        tracing::trace!(
            device = %self.device,
            good,
            pass_low_db = thresholds.pass_low_db,
            stop_high_db = thresholds.stop_high_db,
            "device evaluated"
        );
        good
    }

    /// Evaluate every band (no short-circuit) for reporting.
    pub fn evaluate(&self, thresholds: &ThresholdConfig) -> DeviceVerdict {
        let bands: Vec<(BandRole, BandVerdict)> = BandRole::ALL
            .iter()
            .map(|&role| {
                let verdict = self
                    .band(role)
                    .evaluate(&self.device, thresholds.window_for(role), self.policy);
                (role, verdict)
            })
            .collect();
        let good = bands.iter().all(|(_, v)| v.passed);
        tracing::info!(device = %self.device, good, "device verdict");

        DeviceVerdict {
            device: self.device.clone(),
            thresholds: *thresholds,
            bands,
            good,
        }
    }

    /// Union of the three band maps. Bands are disjoint; on a collision the
    /// earlier band (pass, then stop-left, then stop-right) keeps its value.
    pub fn merged_map(&self) -> FrequencyMagnitudeMap {
        let mut out = FrequencyMagnitudeMap::new();
        for role in BandRole::ALL {
            for (&f, &m) in self.band(role).map() {
                out.entry(f).or_insert(m);
            }
        }
        out
    }

    fn band_passes(&self, role: BandRole, thresholds: &ThresholdConfig) -> bool {
        self.band(role)
            .evaluate(&self.device, thresholds.window_for(role), self.policy)
            .passed
    }
}
