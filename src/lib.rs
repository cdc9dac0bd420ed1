//! `filter-yield` library crate.
//!
//! The binary (`fy`) is a thin wrapper around this library so that:
//!
//! - band evaluation and the sweep are testable without spawning processes
//! - the network loader can be swapped (see `io::NetworkLoader`)

pub mod app;
pub mod band;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod sweep;
