//! Input/output helpers.
//!
//! - Touchstone 2-port network loading (`touchstone`)
//! - device list and check-frequency files (`lists`)
//! - yield table exports (CSV/JSON) (`export`)

pub mod export;
pub mod lists;
pub mod touchstone;

pub use export::*;
pub use lists::*;
pub use touchstone::*;
