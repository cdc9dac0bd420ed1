//! ASCII scatter plot for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - a quick look at the outlier cloud without opening the SVG
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - band samples: `o`
//! - band edges: `|`

use crate::domain::Band;

/// Render `(frequency GHz, S21 dB)` points with optional band edge markers.
pub fn render_scatter(points: &[(f64, f64)], bands: &[Band], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = span(points.iter().map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = span(points.iter().map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Edges first so points overlay them.
    for band in bands {
        for edge in [band.low, band.high] {
            if edge < x_min || edge > x_max {
                continue;
            }
            let x = map_x(edge, x_min, x_max, width);
            for row in grid.iter_mut() {
                row[x] = '|';
            }
        }
    }

    for &(f, db) in points {
        let x = map_x(f, x_min, x_max, width);
        let y = map_y(db, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: freq=[{x_min:.3}, {x_max:.3}] GHz | S21=[{y_min:.2}, {y_max:.2}] dB\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn span(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if max > min { Some((min, max)) } else { Some((min - 0.5, max + 0.5)) }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}
