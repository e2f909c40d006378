use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::driver::RunReport;
use crate::error::Result;
use crate::metrics::RunStatistics;
use crate::propagation::{LayerRecord, PropagationSettings, RunResult};

use super::charts::{draw_histograms, draw_layer_chart};
use super::text_plots::Series;

/// File-name-safe form of a pattern name
pub fn sanitize_name(name: &str) -> String {
    name.replace([' ', '/'], "_")
}

/// Render the `z`/`a` histograms of a run's snapshot layers to `hist_<pattern>.svg`.
pub fn save_histograms(result: &RunResult, bins: usize, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("hist_{}.svg", sanitize_name(&result.config.name)));
    draw_histograms(result, bins, &path)?;
    Ok(path)
}

/// Render the three layer charts: `E[a^2]` for every pattern (log scale), and
/// the shrink ratio and zero fraction for ReLU patterns.
pub fn save_layer_charts(report: &RunReport, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let ex2: Vec<Series> = report
        .results()
        .map(|r| Series::from_values(r.config.name.clone(), &r.a_ex2_series()))
        .collect();

    let relu: Vec<&RunResult> = report.results().filter(|r| r.activation.is_relu()).collect();
    let ratio: Vec<Series> = relu
        .iter()
        .map(|r| Series::new(r.config.name.clone(), r.shrink_ratio_series()))
        .collect();
    let zero: Vec<Series> = relu
        .iter()
        .map(|r| Series::from_values(r.config.name.clone(), &r.zero_frac_series()))
        .collect();

    let charts = [
        ("relu_spread_check_ex2.svg", &ex2, "Propagation of E[a^2] across layers", "E[a^2]", true),
        (
            "relu_spread_check_relu_ratio.svg",
            &ratio,
            "ReLU shrink factor: E[ReLU(z)^2] / E[z^2] (should be ~0.5)",
            "E[a^2] / E[z^2]",
            false,
        ),
        (
            "relu_zero_fraction.svg",
            &zero,
            "ReLU sparsity: fraction of zeros in activation",
            "zero_frac",
            false,
        ),
    ];

    let mut written = Vec::with_capacity(charts.len());
    for (file_name, series, title, y_desc, log_scale) in charts {
        let path = dir.join(file_name);
        draw_layer_chart(series, title, y_desc, log_scale, &path)?;
        written.push(path);
    }
    Ok(written)
}

/// Export every layer record of every successful pattern to CSV
pub fn export_records_csv(report: &RunReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;

    writeln!(file, "pattern,w_init,activation,layer,x_ex2,z_ex2,a_ex2,relu_ex2_ratio,zero_frac")?;
    for result in report.results() {
        for r in &result.records {
            writeln!(
                file,
                "\"{}\",{},{},{},{},{},{},{},{}",
                result.config.name.replace('"', "\"\""),
                result.weight_init,
                result.activation,
                r.layer_index,
                r.x_ex2,
                r.z_ex2,
                r.a_ex2,
                r.relu_ex2_ratio,
                r.zero_frac
            )?;
        }
    }

    info!(path = %path.display(), "saved");
    Ok(())
}

#[derive(Serialize)]
struct PatternEntry<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight_init: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    activation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<RunStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<&'a [LayerRecord]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    settings: &'a PropagationSettings,
    patterns: Vec<PatternEntry<'a>>,
}

/// Export settings, per-pattern records and statistics to JSON. Samples are not included.
pub fn export_report_json(report: &RunReport, settings: &PropagationSettings, path: &Path) -> Result<()> {
    let patterns = report
        .outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(r) => PatternEntry {
                name: &outcome.name,
                weight_init: Some(r.weight_init.to_string()),
                activation: Some(r.activation.to_string()),
                statistics: Some(r.statistics()),
                records: Some(r.records.as_slice()),
                error: None,
            },
            Err(e) => PatternEntry {
                name: &outcome.name,
                weight_init: None,
                activation: None,
                statistics: None,
                records: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    let json = serde_json::to_string_pretty(&ReportDocument { settings, patterns })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    info!(path = %path.display(), "saved");
    Ok(())
}

/// Create a markdown report of the run
pub fn export_markdown_report(report: &RunReport, settings: &PropagationSettings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;

    writeln!(file, "# Signal Propagation Report")?;
    writeln!(file)?;
    writeln!(
        file,
        "depth={}, width={}, batch={}, seed={}",
        settings.depth, settings.width, settings.batch, settings.seed
    )?;
    writeln!(file)?;
    writeln!(file, "| Pattern | w_init | activation | E[a^2] L1 | E[a^2] last | mean decay | mean shrink | mean zero_frac |")?;
    writeln!(file, "|---|---|---|---|---|---|---|---|")?;

    for result in report.results() {
        let s = result.statistics();
        let fmt_opt = |v: Option<f64>| v.map_or_else(|| "undefined".to_string(), |v| format!("{:.4}", v));
        writeln!(
            file,
            "| {} | {} | {} | {:.4e} | {:.4e} | {} | {} | {:.4} |",
            result.config.name,
            result.weight_init,
            result.activation,
            s.first_a_ex2,
            s.last_a_ex2,
            fmt_opt(s.mean_decay_factor),
            fmt_opt(s.mean_shrink_ratio),
            s.mean_zero_frac
        )?;
    }

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        writeln!(file)?;
        writeln!(file, "## Failed patterns")?;
        writeln!(file)?;
        for (name, err) in failures {
            writeln!(file, "- {}: {}", name, err)?;
        }
    }

    info!(path = %path.display(), "saved");
    Ok(())
}

/// Write every artifact of a run into `settings.output_dir`.
pub fn export_all(report: &RunReport, settings: &PropagationSettings) -> Result<Vec<PathBuf>> {
    let dir = settings.output_dir.as_path();
    let mut written = Vec::new();

    for result in report.results() {
        if !result.snapshots.is_empty() {
            written.push(save_histograms(result, settings.histogram_bins, dir)?);
        }
    }
    written.extend(save_layer_charts(report, dir)?);

    let csv = dir.join("records.csv");
    export_records_csv(report, &csv)?;
    written.push(csv);

    let json = dir.join("report.json");
    export_report_json(report, settings, &json)?;
    written.push(json);

    let md = dir.join("report.md");
    export_markdown_report(report, settings, &md)?;
    written.push(md);

    Ok(written)
}
