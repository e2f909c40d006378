use crate::propagation::RunResult;

const MARKERS: [char; 6] = ['*', 'o', '+', 'x', '#', '@'];

/// One named line of a layer chart. `None` points are skipped.
#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn new<S: Into<String>>(label: S, values: Vec<Option<f64>>) -> Self {
        Series {
            label: label.into(),
            values,
        }
    }

    pub fn from_values<S: Into<String>>(label: S, values: &[f64]) -> Self {
        Self::new(label, values.iter().map(|&v| Some(v)).collect())
    }
}

/// Plot several per-layer series on shared axes as ASCII art.
///
/// With `log_scale`, values are plotted as `log10`; non-positive values are skipped.
pub fn plot_layer_series(series: &[Series], title: &str, width: usize, height: usize, log_scale: bool) -> String {
    if width < 10 || height < 5 {
        return format!("{}: Invalid dimensions", title);
    }

    let transform = |v: f64| -> Option<f64> {
        if !v.is_finite() {
            None
        } else if log_scale {
            (v > 0.0).then(|| v.log10())
        } else {
            Some(v)
        }
    };

    let points: Vec<Vec<Option<f64>>> = series
        .iter()
        .map(|s| s.values.iter().map(|v| v.and_then(&transform)).collect())
        .collect();

    let all: Vec<f64> = points.iter().flatten().flatten().copied().collect();
    if all.is_empty() {
        return format!("{}: No data available", title);
    }

    let min_val = all.iter().copied().fold(f64::INFINITY, f64::min);
    let max_val = all.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let max_len = series.iter().map(|s| s.values.len()).max().unwrap_or(0);

    let display = |v: f64| if log_scale { 10f64.powf(v) } else { v };

    let mut output = format!("{}\n", title);
    if (max_val - min_val).abs() < f64::EPSILON {
        output.push_str(&format!("All values are {:.4}\n", display(min_val)));
        output.push_str(&legend(series));
        return output;
    }

    let mut plot = vec![vec![' '; width]; height];

    // Add axes
    for row in plot.iter_mut() {
        row[0] = '|';
    }
    for j in 0..width {
        plot[height - 1][j] = '-';
    }
    plot[height - 1][0] = '+';

    // Plot data points
    let x_scale = if max_len > 1 {
        (max_len - 1) as f64 / (width - 3) as f64
    } else {
        1.0
    };
    let y_scale = (height - 3) as f64 / (max_val - min_val);

    for (s, values) in points.iter().enumerate() {
        let marker = MARKERS[s % MARKERS.len()];
        for (i, value) in values.iter().enumerate() {
            let Some(value) = value else { continue };
            let x = ((i as f64 / x_scale) as usize + 2).min(width - 1);
            let offset = ((value - min_val) * y_scale) as usize;
            let y = (height - 3).saturating_sub(offset).min(height - 2);
            plot[y][x] = marker;
        }
    }

    output.push_str(&format!("Max: {:.4e}\n", display(max_val)));
    for row in plot.iter() {
        output.push_str(&row.iter().collect::<String>());
        output.push('\n');
    }
    output.push_str(&format!("Min: {:.4e}\n", display(min_val)));
    output.push_str(&format!("Layers: 1..{}{}\n", max_len, if log_scale { " (log scale)" } else { "" }));
    output.push_str(&legend(series));

    output
}

fn legend(series: &[Series]) -> String {
    series
        .iter()
        .enumerate()
        .map(|(i, s)| format!("  {} {}\n", MARKERS[i % MARKERS.len()], s.label))
        .collect()
}

/// Create a simple histogram
pub fn histogram(values: &[f32], bins: usize) -> String {
    if values.is_empty() || bins == 0 {
        return "No data for histogram\n".to_string();
    }

    let min_val = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max_val = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    if (max_val - min_val).abs() < f32::EPSILON {
        return format!("All {} values are {:.4}\n", values.len(), min_val);
    }

    let counts = histogram_counts(values, bins, min_val, max_val);
    let bin_width = (max_val - min_val) / bins as f32;
    let max_count = counts.iter().copied().max().unwrap_or(1).max(1);
    let scale = 40.0 / max_count as f32;

    let mut output = String::new();
    for (i, &count) in counts.iter().enumerate() {
        let bin_start = min_val + i as f32 * bin_width;
        let bin_end = bin_start + bin_width;
        let bar = "#".repeat((count as f32 * scale) as usize);
        output.push_str(&format!("[{:>8.3}, {:>8.3}): {:>7} {}\n", bin_start, bin_end, count, bar));
    }

    output
}

/// Bin counts over `[min_val, max_val]`; the top edge falls in the last bin.
pub fn histogram_counts(values: &[f32], bins: usize, min_val: f32, max_val: f32) -> Vec<usize> {
    let mut counts = vec![0; bins];
    if bins == 0 {
        return counts;
    }
    let bin_width = (max_val - min_val) / bins as f32;
    for &value in values {
        let bin = if bin_width > 0.0 {
            (((value - min_val) / bin_width).floor().max(0.0) as usize).min(bins - 1)
        } else {
            0
        };
        counts[bin] += 1;
    }
    counts
}

/// Histograms of `z` and `a` for every snapshot layer of a run
pub fn snapshot_histograms(result: &RunResult, bins: usize) -> String {
    let name = &result.config.name;
    let mut output = String::new();
    for (layer, snapshot) in &result.snapshots {
        output.push_str(&format!("{}  layer={}  z (pre-activation), {} samples\n", name, layer, snapshot.z_samples.len()));
        output.push_str(&histogram(&snapshot.z_samples, bins));
        output.push('\n');
        output.push_str(&format!("{}  layer={}  a (activation), {} samples\n", name, layer, snapshot.a_samples.len()));
        output.push_str(&histogram(&snapshot.a_samples, bins));
        output.push('\n');
    }
    output
}

fn record_line(result: &RunResult, index: usize) -> String {
    let r = &result.records[index];
    format!(
        "[L{:02}] E[z^2]={:.4}  E[a^2]={:.4}  E[a^2]/E[z^2]={:.4}  zero_frac={:.3}\n",
        r.layer_index, r.z_ex2, r.a_ex2, r.relu_ex2_ratio, r.zero_frac
    )
}

/// Summary of one run: the first three layers, the last layer and, for ReLU,
/// the layer means of the shrink ratio and zero fraction.
pub fn run_summary(result: &RunResult) -> String {
    let mut output = format!(
        "=== {}  (w_init={}, act={}) ===\n",
        result.config.name, result.weight_init, result.activation
    );

    let n = result.records.len();
    for i in 0..n.min(3) {
        output.push_str(&record_line(result, i));
    }
    if n > 3 {
        output.push_str(&record_line(result, n - 1));
    }

    if result.activation.is_relu() {
        let stats = result.statistics();
        match stats.mean_shrink_ratio {
            Some(mean) => output.push_str(&format!("mean(E[a^2]/E[z^2]) over layers = {:.4}  (theory: ~0.5)\n", mean)),
            None => output.push_str("mean(E[a^2]/E[z^2]) over layers = undefined\n"),
        }
        if stats.undefined_ratio_layers > 0 {
            output.push_str(&format!("  ({} layers with undefined ratio excluded)\n", stats.undefined_ratio_layers));
        }
        output.push_str(&format!("mean(zero_frac) over layers       = {:.4}  (expected: ~0.5)\n", stats.mean_zero_frac));
    }

    output
}
