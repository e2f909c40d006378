//! SVG figures: per-layer histograms and layer-series line charts.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::error::{Result, SpreadError};
use crate::propagation::RunResult;

use super::text_plots::{histogram_counts, Series};

const LINE_COLORS: [RGBColor; 6] = [BLUE, RED, GREEN, MAGENTA, CYAN, BLACK];

fn svg_root(path: &Path, size: (u32, u32)) -> SVGBackend<'_> {
    info!(path = %path.display(), "saving figure");
    SVGBackend::new(path, size)
}

/// Draw one row per snapshot layer: the `z` histogram on the left, `a` on the right.
pub fn draw_histograms(result: &RunResult, bins: usize, path: &Path) -> Result<()> {
    let rows = result.snapshots.len().max(1);
    let root = svg_root(path, (1000, 300 * rows as u32)).into_drawing_area();
    root.fill(&WHITE).map_err(SpreadError::plot)?;

    let panels = root.split_evenly((rows, 2));
    let name = &result.config.name;
    for (i, (layer, snapshot)) in result.snapshots.iter().enumerate() {
        draw_histogram_panel(
            &panels[2 * i],
            &format!("{}  layer={}  z (pre-activation)", name, layer),
            &snapshot.z_samples,
            bins,
        )?;
        draw_histogram_panel(
            &panels[2 * i + 1],
            &format!("{}  layer={}  a (activation)", name, layer),
            &snapshot.a_samples,
            bins,
        )?;
    }

    root.present().map_err(SpreadError::plot)?;
    Ok(())
}

fn draw_histogram_panel(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    caption: &str,
    values: &[f32],
    bins: usize,
) -> Result<()> {
    let mut min_val = values.iter().copied().fold(f32::INFINITY, f32::min);
    let mut max_val = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if values.is_empty() {
        min_val = 0.0;
        max_val = 1.0;
    } else if max_val - min_val < f32::EPSILON {
        min_val -= 0.5;
        max_val += 0.5;
    }

    let counts = histogram_counts(values, bins, min_val, max_val);
    let bin_width = (max_val - min_val) / bins.max(1) as f32;
    let y_max = counts.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 16))
        .margin(8)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(min_val..max_val, 0.0f64..y_max)
        .map_err(SpreadError::plot)?;

    chart
        .configure_mesh()
        .y_desc("count")
        .x_labels(8)
        .draw()
        .map_err(SpreadError::plot)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x0 = min_val + i as f32 * bin_width;
            Rectangle::new([(x0, 0.0), (x0 + bin_width, count as f64)], BLUE.mix(0.6).filled())
        }))
        .map_err(SpreadError::plot)?;

    Ok(())
}

fn series_points(series: &Series, log_scale: bool) -> Vec<(usize, f64)> {
    series
        .values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| {
            v.filter(|v| v.is_finite() && (!log_scale || *v > 0.0))
                .map(|v| (i + 1, v))
        })
        .collect()
}

/// Draw per-layer series as a line chart with a legend.
///
/// With `log_scale` the y-axis is logarithmic and non-positive values are dropped.
/// Undefined (`None`) points are skipped.
pub fn draw_layer_chart(series: &[Series], title: &str, y_desc: &str, log_scale: bool, path: &Path) -> Result<()> {
    let root = svg_root(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(SpreadError::plot)?;

    let points: Vec<Vec<(usize, f64)>> = series.iter().map(|s| series_points(s, log_scale)).collect();
    let values: Vec<f64> = points.iter().flatten().map(|&(_, v)| v).collect();
    let max_layer = series.iter().map(|s| s.values.len()).max().unwrap_or(0).max(2);

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if values.is_empty() {
        lo = if log_scale { 0.1 } else { 0.0 };
        hi = 1.0;
    }

    let mut builder = ChartBuilder::on(&root);
    builder
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70);

    if log_scale {
        let mut chart = builder
            .build_cartesian_2d(1usize..max_layer, (lo / 1.5..hi * 1.5).log_scale())
            .map_err(SpreadError::plot)?;
        chart
            .configure_mesh()
            .x_desc("layer")
            .y_desc(y_desc)
            .draw()
            .map_err(SpreadError::plot)?;
        for (i, (s, pts)) in series.iter().zip(points).enumerate() {
            let color = LINE_COLORS[i % LINE_COLORS.len()];
            chart
                .draw_series(LineSeries::new(pts, color.stroke_width(2)))
                .map_err(SpreadError::plot)?
                .label(s.label.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(SpreadError::plot)?;
    } else {
        let pad = ((hi - lo) * 0.05).max(0.05);
        let mut chart = builder
            .build_cartesian_2d(1usize..max_layer, (lo - pad)..(hi + pad))
            .map_err(SpreadError::plot)?;
        chart
            .configure_mesh()
            .x_desc("layer")
            .y_desc(y_desc)
            .draw()
            .map_err(SpreadError::plot)?;
        for (i, (s, pts)) in series.iter().zip(points).enumerate() {
            let color = LINE_COLORS[i % LINE_COLORS.len()];
            chart
                .draw_series(LineSeries::new(pts, color.stroke_width(2)))
                .map_err(SpreadError::plot)?
                .label(s.label.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(SpreadError::plot)?;
    }

    root.present().map_err(SpreadError::plot)?;
    Ok(())
}
