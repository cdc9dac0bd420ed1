//! Pass/fail evaluation of one band against a decibel window.

use std::ops::Bound::{Excluded, Unbounded};
use std::sync::Arc;

use crate::band::extractor::{FrequencyMagnitudeMap, extract_band};
use crate::domain::{Band, CheckFrequencySet, DbWindow, Frequency, MissingSamplePolicy, ResponseCurve};

/// Where a checked magnitude came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagnitudeSource {
    /// A measured sample at exactly this frequency.
    Measured,
    /// No sample; 0.0 dB substituted (`MissingSamplePolicy::ZeroDefault`).
    ZeroDefault,
    /// Linear interpolation between the neighbouring band samples.
    Interpolated,
    /// No sample and the policy refused to substitute one.
    Uncovered,
}

/// The first check frequency that fell outside the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Violation {
    pub frequency: Frequency,
    /// `None` when the frequency was uncovered.
    pub magnitude_db: Option<f64>,
    pub source: MagnitudeSource,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandVerdict {
    pub passed: bool,
    /// Number of check frequencies examined before stopping.
    pub checked: usize,
    pub violation: Option<Violation>,
}

/// Evaluate with the legacy zero-default policy.
///
/// Returns `true` iff `low_db < magnitude < high_db` for every required
/// frequency. An empty `required` set passes.
pub fn evaluate(map: &FrequencyMagnitudeMap, required: &CheckFrequencySet, low_db: f64, high_db: f64) -> bool {
    evaluate_with(
        map,
        required,
        DbWindow::new(low_db, high_db),
        MissingSamplePolicy::ZeroDefault,
    )
    .passed
}

/// Evaluate required frequencies in ascending order, stopping at the first violation.
pub fn evaluate_with(
    map: &FrequencyMagnitudeMap,
    required: &CheckFrequencySet,
    window: DbWindow,
    policy: MissingSamplePolicy,
) -> BandVerdict {
    let mut checked = 0usize;
    for frequency in required.iter() {
        checked += 1;
        let (magnitude_db, source) = resolve_magnitude(map, frequency, policy);
        let inside = magnitude_db.is_some_and(|m| window.contains(m));
        if !inside {
            return BandVerdict {
                passed: false,
                checked,
                violation: Some(Violation {
                    frequency,
                    magnitude_db,
                    source,
                }),
            };
        }
    }

    BandVerdict {
        passed: true,
        checked,
        violation: None,
    }
}

/// Look up a check frequency, applying the missing-sample policy.
pub fn resolve_magnitude(
    map: &FrequencyMagnitudeMap,
    frequency: Frequency,
    policy: MissingSamplePolicy,
) -> (Option<f64>, MagnitudeSource) {
    if let Some(&m) = map.get(&frequency) {
        return (Some(m), MagnitudeSource::Measured);
    }

    match policy {
        MissingSamplePolicy::ZeroDefault => (Some(0.0), MagnitudeSource::ZeroDefault),
        MissingSamplePolicy::StrictFail => (None, MagnitudeSource::Uncovered),
        MissingSamplePolicy::Interpolate => match interpolate(map, frequency) {
            Some(m) => (Some(m), MagnitudeSource::Interpolated),
            None => (None, MagnitudeSource::Uncovered),
        },
    }
}

fn interpolate(map: &FrequencyMagnitudeMap, frequency: Frequency) -> Option<f64> {
    let (f0, m0) = map.range(..frequency).next_back()?;
    let (f1, m1) = map.range((Excluded(frequency), Unbounded)).next()?;
    let (x0, x1, x) = (f0.ghz(), f1.ghz(), frequency.ghz());
    let m = m0 + (m1 - m0) * (x - x0) / (x1 - x0);
    m.is_finite().then_some(m)
}

/// One band of one device: its extracted samples plus the frequencies to check.
#[derive(Debug, Clone)]
pub struct BandCheck {
    band: Band,
    map: FrequencyMagnitudeMap,
    required: Arc<CheckFrequencySet>,
}

impl BandCheck {
    pub fn new(curve: &ResponseCurve, band: Band, required: Arc<CheckFrequencySet>) -> Self {
        let map = extract_band(curve, &band);
        Self { band, map, required }
    }

    pub fn map(&self) -> &FrequencyMagnitudeMap {
        &self.map
    }

    pub fn evaluate(&self, device: &str, window: DbWindow, policy: MissingSamplePolicy) -> BandVerdict {
        let verdict = evaluate_with(&self.map, &self.required, window, policy);
        match verdict.violation {
            Some(v) => tracing::debug!(
                device,
                band = self.band.role.label(),
                frequency = v.frequency.ghz(),
                magnitude_db = ?v.magnitude_db,
                source = ?v.source,
                low_db = window.low_db,
                high_db = window.high_db,
                "band check failed"
            ),
            None => tracing::debug!(
                device,
                band = self.band.role.label(),
                checked = verdict.checked,
                "band check passed"
            ),
        }
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(points: &[(f64, f64)]) -> FrequencyMagnitudeMap {
        points
            .iter()
            .map(|&(f, db)| (Frequency::from_ghz(f), db))
            .collect()
    }

    fn checks(freqs: &[f64]) -> CheckFrequencySet {
        freqs.iter().copied().collect()
    }

    #[test]
    fn empty_required_set_passes() {
        let m = map(&[(6.3, -100.0)]);
        assert!(evaluate(&m, &CheckFrequencySet::default(), -10.0, -1.0));
        let v = evaluate_with(
            &m,
            &CheckFrequencySet::default(),
            DbWindow::new(-10.0, -1.0),
            MissingSamplePolicy::StrictFail,
        );
        assert!(v.passed);
        assert_eq!(v.checked, 0);
    }

    #[test]
    fn out_of_range_point_fails_and_is_identified() {
        let m = map(&[(6.3, -5.0), (6.5, -30.0)]);
        let v = evaluate_with(
            &m,
            &checks(&[6.3, 6.5]),
            DbWindow::new(-20.0, 0.0),
            MissingSamplePolicy::ZeroDefault,
        );
        assert!(!v.passed);
        let violation = v.violation.unwrap();
        assert_eq!(violation.frequency, Frequency::from_ghz(6.5));
        assert_eq!(violation.magnitude_db, Some(-30.0));
        assert_eq!(violation.source, MagnitudeSource::Measured);
    }

    #[test]
    fn stops_at_first_violation() {
        let m = map(&[(6.3, -50.0), (6.5, -50.0)]);
        let v = evaluate_with(
            &m,
            &checks(&[6.3, 6.5]),
            DbWindow::new(-20.0, 0.0),
            MissingSamplePolicy::ZeroDefault,
        );
        assert_eq!(v.checked, 1);
        assert_eq!(v.violation.unwrap().frequency, Frequency::from_ghz(6.3));
    }

    #[test]
    fn window_bounds_are_strict() {
        let m = map(&[(6.3, -20.0)]);
        assert!(!evaluate(&m, &checks(&[6.3]), -20.0, 0.0));
        let m = map(&[(6.3, 0.0)]);
        assert!(!evaluate(&m, &checks(&[6.3]), -20.0, 0.0));
    }

    #[test]
    fn missing_sample_defaults_to_zero_db() {
        let m = FrequencyMagnitudeMap::new();
        let required = checks(&[6.4]);
        // 0 dB is outside (-10, -1).
        assert!(!evaluate(&m, &required, -10.0, -1.0));
        // 0 dB is inside (-5, 5): passes with no sample at all.
        assert!(evaluate(&m, &required, -5.0, 5.0));

        let v = evaluate_with(&m, &required, DbWindow::new(-10.0, -1.0), MissingSamplePolicy::ZeroDefault);
        let violation = v.violation.unwrap();
        assert_eq!(violation.magnitude_db, Some(0.0));
        assert_eq!(violation.source, MagnitudeSource::ZeroDefault);
    }

    #[test]
    fn strict_policy_fails_uncovered_frequency() {
        let m = map(&[(6.3, -2.0)]);
        let v = evaluate_with(
            &m,
            &checks(&[6.3, 6.4]),
            DbWindow::new(-5.0, 5.0),
            MissingSamplePolicy::StrictFail,
        );
        assert!(!v.passed);
        let violation = v.violation.unwrap();
        assert_eq!(violation.frequency, Frequency::from_ghz(6.4));
        assert_eq!(violation.magnitude_db, None);
        assert_eq!(violation.source, MagnitudeSource::Uncovered);
    }

    #[test]
    fn interpolate_policy_uses_neighbours() {
        let m = map(&[(6.0, -10.0), (7.0, -20.0)]);
        let (mag, source) = resolve_magnitude(&m, Frequency::from_ghz(6.5), MissingSamplePolicy::Interpolate);
        assert_eq!(source, MagnitudeSource::Interpolated);
        assert!((mag.unwrap() + 15.0).abs() < 1e-12);

        // Outside the sampled span there is nothing to bracket.
        let (mag, source) = resolve_magnitude(&m, Frequency::from_ghz(7.5), MissingSamplePolicy::Interpolate);
        assert_eq!(mag, None);
        assert_eq!(source, MagnitudeSource::Uncovered);
    }
}
