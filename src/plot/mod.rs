//! Plot rendering: terminal scatter (`ascii`) and SVG files (`svg`).

pub mod ascii;
pub mod svg;

pub use ascii::render_scatter;
pub use svg::{plot_curve, plot_scatter};
