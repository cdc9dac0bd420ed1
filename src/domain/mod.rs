//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - measured data (`Frequency`, `Sample`, `ResponseCurve`)
//! - band definitions (`BandRole`, `Band`, `CheckFrequencySet`)
//! - acceptance windows (`DbWindow`, `ThresholdConfig`, `MissingSamplePolicy`)
//! - run configuration derived from the CLI (`CheckConfig`, `SweepConfig`, `SkippedDevice`)

pub mod types;

pub use types::*;
