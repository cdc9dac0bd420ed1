//! Threshold sweep and yield tabulation.
//!
//! Responsibilities:
//!
//! - generate the 2-D grid of threshold configurations (`grid`)
//! - evaluate every device in every cell (parallel) (`sweeper`)
//! - collect per-cell results into a yield multimap (`table`)

pub mod grid;
pub mod sweeper;
pub mod table;

pub use grid::*;
pub use sweeper::*;
pub use table::*;
