//! SVG charts via Plotters.
//!
//! The core treats these as fire-and-forget: callers log failures and carry on,
//! plot output never affects a verdict.

use std::path::Path;

use plotters::coord::types::RangedCoordf64;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use crate::domain::{Band, BandRole, ResponseCurve};
use crate::error::AppError;

const SIZE: (u32, u32) = (1024, 640);

/// Draw one device's S21 response with the band intervals shaded.
pub fn plot_curve(curve: &ResponseCurve, bands: &[Band], title: &str, dest: &Path) -> Result<(), AppError> {
    let points: Vec<(f64, f64)> = curve
        .samples()
        .iter()
        .map(|s| (s.frequency.ghz(), s.magnitude_db))
        .filter(|(f, db)| f.is_finite() && db.is_finite())
        .collect();

    draw_curve(&points, bands, title, dest)
        .map_err(|e| AppError::output(format!("Failed to plot '{}': {e}", dest.display())))
}

/// Draw the merged band samples of every device as a scatter plot.
pub fn plot_scatter(points: &[(f64, f64)], bands: &[Band], title: &str, dest: &Path) -> Result<(), AppError> {
    draw_scatter(points, bands, title, dest)
        .map_err(|e| AppError::output(format!("Failed to plot '{}': {e}", dest.display())))
}

fn draw_curve(
    points: &[(f64, f64)],
    bands: &[Band],
    title: &str,
    dest: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let (x0, x1) = span(points.iter().map(|p| p.0)).ok_or("no finite samples")?;
    let (y0, y1) = span(points.iter().map(|p| p.1)).ok_or("no finite samples")?;

    let root = SVGBackend::new(dest, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(12)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("Frequency (GHz)")
        .y_desc("S21 (dB)")
        .draw()?;

    shade_bands(&mut chart, bands, (x0, x1), (y0, y1))?;
    chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;

    root.present()?;
    Ok(())
}

fn draw_scatter(
    points: &[(f64, f64)],
    bands: &[Band],
    title: &str,
    dest: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let (x0, x1) = span(points.iter().map(|p| p.0)).ok_or("no points to plot")?;
    let (y0, y1) = span(points.iter().map(|p| p.1)).ok_or("no points to plot")?;

    let root = SVGBackend::new(dest, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(12)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("Frequency (GHz)")
        .y_desc("S21 (dB)")
        .draw()?;

    shade_bands(&mut chart, bands, (x0, x1), (y0, y1))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(f, db)| Circle::new((f, db), 2, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

fn shade_bands<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    bands: &[Band],
    (x0, x1): (f64, f64),
    (y0, y1): (f64, f64),
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    for band in bands {
        let low = band.low.max(x0);
        let high = band.high.min(x1);
        if low >= high {
            continue;
        }
        let color = band_color(band.role);
        chart.draw_series(std::iter::once(Rectangle::new(
            [(low, y0), (high, y1)],
            color.mix(0.15).filled(),
        )))?;
    }
    Ok(())
}

fn band_color(role: BandRole) -> RGBColor {
    match role {
        BandRole::Pass => GREEN,
        BandRole::StopLeft | BandRole::StopRight => RED,
    }
}

/// Finite min/max, widened when all values coincide.
fn span(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if max > min { Some((min, max)) } else { Some((min - 0.5, max + 0.5)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BandRange, Sample};

    #[test]
    fn curve_plot_writes_svg() {
        let curve = ResponseCurve::new(vec![
            Sample::new(5.5, -50.0),
            Sample::new(6.3, -5.0),
            Sample::new(6.5, -3.0),
            Sample::new(7.4, -60.0),
        ])
        .unwrap();
        let bands = [Band::new(BandRole::Pass, BandRange::new(6.25, 6.75)).unwrap()];
        let path = std::env::temp_dir().join(format!("fy-curve-{}.svg", std::process::id()));

        plot_curve(&curve, &bands, "dut.s2p", &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(text.contains("<svg"));
    }

    #[test]
    fn scatter_without_points_is_an_error() {
        let path = std::env::temp_dir().join(format!("fy-scatter-empty-{}.svg", std::process::id()));
        assert!(plot_scatter(&[], &[], "all", &path).is_err());
    }
}
