//! Image rendering of rank-frequency curves.

use std::path::{Path, PathBuf};

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::curve::{CurveRenderer, PlotLabels, RankFrequencyCurve};
use crate::error::{AnalysisError, Result};

/// Draws a curve as an SVG image: a scatter of its points joined by a line,
/// with the title and axis labels from [`PlotLabels`].
#[derive(Clone, Copy, Debug)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        ChartRenderer {
            width: 800,
            height: 600,
        }
    }
}

impl ChartRenderer {
    /// Whether `path` has an extension this renderer can draw.
    pub fn supports(path: &Path) -> bool {
        matches!(path.extension().and_then(|e| e.to_str()), Some("svg"))
    }
}

fn draw_curve<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    curve: &RankFrequencyCurve,
    labels: &PlotLabels,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let points: Vec<(f64, f64)> = curve
        .points()
        .iter()
        .map(|p| (p.log_rank, p.log_frequency))
        .collect();
    let x_max = points.iter().map(|p| p.0).fold(0.0, f64::max).max(1.0) * 1.05;
    let y_max = points.iter().map(|p| p.1).fold(0.0, f64::max).max(1.0) * 1.05;

    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(&labels.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;
    chart
        .configure_mesh()
        .x_desc(labels.x_label.as_str())
        .y_desc(labels.y_label.as_str())
        .draw()?;
    chart.draw_series(LineSeries::new(points.iter().copied(), &RED))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())),
    )?;
    root.present()?;
    Ok(())
}

impl CurveRenderer for ChartRenderer {
    fn render(
        &self,
        curve: &RankFrequencyCurve,
        labels: &PlotLabels,
        path: &Path,
    ) -> Result<PathBuf> {
        if curve.is_empty() {
            return Err(AnalysisError::invalid_input("cannot plot an empty curve"));
        }
        let size = (self.width, self.height);
        if !Self::supports(path) {
            return Err(AnalysisError::configuration(format!(
                "{}: plot images must be .svg",
                path.display()
            )));
        }
        draw_curve(SVGBackend::new(path, size).into_drawing_area(), curve, labels)
            .map_err(|e| AnalysisError::render(e.to_string()))?;
        info!("plotted {} points to {}", curve.len(), path.display());
        Ok(path.to_path_buf())
    }
}
