//! Shared domain types.
//!
//! Frequencies are carried in GHz everywhere inside the crate; the network
//! loader converts from whatever unit the measurement file declares.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A frequency in GHz with a total order, so it can key ordered maps and sets.
///
/// Lookups are exact: two frequencies are equal only if their `f64` bit patterns
/// compare equal under `total_cmp`. No tolerance is applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frequency(f64);

impl Frequency {
    pub fn from_ghz(ghz: f64) -> Self {
        Self(ghz)
    }

    pub fn ghz(self) -> f64 {
        self.0
    }
}

impl PartialEq for Frequency {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Frequency {}

impl PartialOrd for Frequency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frequency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One measured point: forward transmission magnitude (dB) at a frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub frequency: Frequency,
    pub magnitude_db: f64,
}

impl Sample {
    pub fn new(frequency_ghz: f64, magnitude_db: f64) -> Self {
        Self {
            frequency: Frequency::from_ghz(frequency_ghz),
            magnitude_db,
        }
    }
}

/// S21 response of one device, in file order. Never empty.
#[derive(Debug, Clone)]
pub struct ResponseCurve {
    samples: Vec<Sample>,
}

impl ResponseCurve {
    pub fn new(samples: Vec<Sample>) -> Result<Self, AppError> {
        if samples.is_empty() {
            return Err(AppError::new(
                crate::error::ErrorKind::MalformedNetwork,
                "Response curve has no samples.",
            ));
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Semantic role of a band in the filter mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandRole {
    Pass,
    StopLeft,
    StopRight,
}

impl BandRole {
    pub const ALL: [BandRole; 3] = [BandRole::Pass, BandRole::StopLeft, BandRole::StopRight];

    /// Label used in logs and terminal output.
    pub fn label(self) -> &'static str {
        match self {
            BandRole::Pass => "PASS_BAND",
            BandRole::StopLeft => "STOP_BAND_LEFT",
            BandRole::StopRight => "STOP_BAND_RIGHT",
        }
    }

    /// Name of the well-known check-frequency file for this band.
    pub fn frequency_file_name(self) -> &'static str {
        match self {
            BandRole::Pass => "pass_band_frequencies",
            BandRole::StopLeft => "stop_band_left_frequencies",
            BandRole::StopRight => "stop_band_right_frequencies",
        }
    }
}

/// `LOW:HIGH` frequency interval in GHz, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRange {
    pub low: f64,
    pub high: f64,
}

impl BandRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

impl FromStr for BandRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (low, high) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected LOW:HIGH in GHz, got '{s}'."))?;
        let low: f64 = low
            .trim()
            .parse()
            .map_err(|e| format!("Invalid band low edge '{low}': {e}"))?;
        let high: f64 = high
            .trim()
            .parse()
            .map_err(|e| format!("Invalid band high edge '{high}': {e}"))?;
        Ok(Self { low, high })
    }
}

impl fmt::Display for BandRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.low, self.high)
    }
}

pub const DEFAULT_PASS_BAND: BandRange = BandRange::new(6.25, 6.75);
pub const DEFAULT_STOP_LEFT: BandRange = BandRange::new(5.4, 5.7);
pub const DEFAULT_STOP_RIGHT: BandRange = BandRange::new(7.3, 7.6);

/// A named open frequency interval `(low, high)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub role: BandRole,
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub fn new(role: BandRole, range: BandRange) -> Result<Self, AppError> {
        let BandRange { low, high } = range;
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(AppError::config(format!(
                "Invalid {} range: low={low}, high={high} (must be finite and low<high).",
                role.label()
            )));
        }
        Ok(Self { role, low, high })
    }

    /// Strict membership test.
    pub fn contains(&self, frequency: Frequency) -> bool {
        self.low < frequency.ghz() && frequency.ghz() < self.high
    }
}

/// Frequencies at which one band is checked. Sorted and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckFrequencySet {
    frequencies: BTreeSet<Frequency>,
}

impl CheckFrequencySet {
    pub fn iter(&self) -> impl Iterator<Item = Frequency> + '_ {
        self.frequencies.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

impl FromIterator<f64> for CheckFrequencySet {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            frequencies: iter.into_iter().map(Frequency::from_ghz).collect(),
        }
    }
}

/// Open decibel window `(low_db, high_db)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DbWindow {
    pub low_db: f64,
    pub high_db: f64,
}

impl DbWindow {
    pub fn new(low_db: f64, high_db: f64) -> Self {
        Self { low_db, high_db }
    }

    pub fn contains(&self, magnitude_db: f64) -> bool {
        self.low_db < magnitude_db && magnitude_db < self.high_db
    }
}

impl fmt::Display for DbWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) dB", self.low_db, self.high_db)
    }
}

/// Acceptance thresholds for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub pass_low_db: f64,
    pub pass_high_db: f64,
    pub stop_low_db: f64,
    pub stop_high_db: f64,
}

impl ThresholdConfig {
    /// Compiled-in thresholds of the single-device check.
    pub const CHECK_DEFAULT: ThresholdConfig = ThresholdConfig {
        pass_low_db: -24.0,
        pass_high_db: 0.0,
        stop_low_db: -200.0,
        stop_high_db: -30.0,
    };

    /// Base thresholds of the yield sweep (cell `(0, 0)`).
    pub const SWEEP_BASE: ThresholdConfig = ThresholdConfig {
        pass_low_db: -20.0,
        pass_high_db: 0.0,
        stop_low_db: -200.0,
        stop_high_db: -30.0,
    };

    pub fn pass_window(&self) -> DbWindow {
        DbWindow::new(self.pass_low_db, self.pass_high_db)
    }

    pub fn stop_window(&self) -> DbWindow {
        DbWindow::new(self.stop_low_db, self.stop_high_db)
    }

    /// Window that applies to a band of the given role.
    pub fn window_for(&self, role: BandRole) -> DbWindow {
        match role {
            BandRole::Pass => self.pass_window(),
            BandRole::StopLeft | BandRole::StopRight => self.stop_window(),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let values = [self.pass_low_db, self.pass_high_db, self.stop_low_db, self.stop_high_db];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(AppError::config("Thresholds must be finite."));
        }
        if self.pass_low_db >= self.pass_high_db {
            return Err(AppError::config(format!(
                "Pass-band window is empty: low={} >= high={}.",
                self.pass_low_db, self.pass_high_db
            )));
        }
        if self.stop_low_db >= self.stop_high_db {
            return Err(AppError::config(format!(
                "Stop-band window is empty: low={} >= high={}.",
                self.stop_low_db, self.stop_high_db
            )));
        }
        Ok(())
    }
}

/// What to do when a check frequency has no measured sample in its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum MissingSamplePolicy {
    /// Treat the missing magnitude as 0.0 dB.
    ///
    /// This is the legacy behavior. A window containing 0 dB (e.g. a pass-band
    /// upper bound above zero) will pass a frequency that was never measured.
    #[default]
    #[serde(rename = "zero")]
    #[value(name = "zero")]
    ZeroDefault,
    /// Fail the band at the first uncovered check frequency.
    #[serde(rename = "strict")]
    #[value(name = "strict")]
    StrictFail,
    /// Linearly interpolate between the nearest band samples on either side;
    /// fail if no bracketing pair exists.
    #[serde(rename = "interpolate")]
    #[value(name = "interpolate")]
    Interpolate,
}

impl MissingSamplePolicy {
    /// Name as accepted by `--missing-sample`.
    pub fn name(self) -> &'static str {
        match self {
            MissingSamplePolicy::ZeroDefault => "zero",
            MissingSamplePolicy::StrictFail => "strict",
            MissingSamplePolicy::Interpolate => "interpolate",
        }
    }
}

/// Band edges for a run (derived from flags, defaults above).
#[derive(Debug, Clone, Copy)]
pub struct BandLayout {
    pub pass: BandRange,
    pub stop_left: BandRange,
    pub stop_right: BandRange,
}

impl Default for BandLayout {
    fn default() -> Self {
        Self {
            pass: DEFAULT_PASS_BAND,
            stop_left: DEFAULT_STOP_LEFT,
            stop_right: DEFAULT_STOP_RIGHT,
        }
    }
}

impl BandLayout {
    pub fn range(&self, role: BandRole) -> BandRange {
        match role {
            BandRole::Pass => self.pass,
            BandRole::StopLeft => self.stop_left,
            BandRole::StopRight => self.stop_right,
        }
    }
}

/// A listed device that could not be loaded and was left out of the sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDevice {
    pub label: String,
    pub reason: String,
}

/// Configuration of `fy check`.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub device: PathBuf,
    pub data_dir: PathBuf,
    pub bands: BandLayout,
    pub thresholds: ThresholdConfig,
    pub policy: MissingSamplePolicy,
    pub plot: bool,
    pub plot_dir: Option<PathBuf>,
}

/// Configuration of `fy sweep`.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub data_dir: PathBuf,
    pub device_list: PathBuf,
    pub bands: BandLayout,
    pub base: ThresholdConfig,
    pub pass_low_steps: usize,
    pub stop_high_steps: usize,
    pub policy: MissingSamplePolicy,
    pub fail_fast: bool,

    pub plot: bool,
    pub plot_dir: Option<PathBuf>,
    pub ascii: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_range_parses_low_high() {
        let r: BandRange = "6.25:6.75".parse().unwrap();
        assert_eq!(r, BandRange::new(6.25, 6.75));
        assert!("6.25".parse::<BandRange>().is_err());
        assert!("a:b".parse::<BandRange>().is_err());
    }

    #[test]
    fn band_rejects_inverted_range() {
        assert!(Band::new(BandRole::Pass, BandRange::new(6.75, 6.25)).is_err());
        assert!(Band::new(BandRole::Pass, BandRange::new(6.0, 6.0)).is_err());
    }

    #[test]
    fn band_membership_is_strict() {
        let band = Band::new(BandRole::StopLeft, DEFAULT_STOP_LEFT).unwrap();
        assert!(!band.contains(Frequency::from_ghz(5.4)));
        assert!(band.contains(Frequency::from_ghz(5.5)));
        assert!(!band.contains(Frequency::from_ghz(5.7)));
    }

    #[test]
    fn check_set_dedups_and_sorts() {
        let set: CheckFrequencySet = [6.5, 6.3, 6.5, 6.4].into_iter().collect();
        let v: Vec<f64> = set.iter().map(Frequency::ghz).collect();
        assert_eq!(v, vec![6.3, 6.4, 6.5]);
    }

    #[test]
    fn threshold_validation_rejects_empty_windows() {
        assert!(ThresholdConfig::CHECK_DEFAULT.validate().is_ok());
        let bad = ThresholdConfig {
            pass_low_db: 0.0,
            ..ThresholdConfig::CHECK_DEFAULT
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn stop_bands_share_the_stop_window() {
        let t = ThresholdConfig::SWEEP_BASE;
        assert_eq!(t.window_for(BandRole::StopLeft), t.window_for(BandRole::StopRight));
        assert_eq!(t.window_for(BandRole::Pass), DbWindow::new(-20.0, 0.0));
    }
}
