use std::collections::BTreeMap;

use crate::activations::Activation;
use crate::layers::WeightInit;
use crate::propagation::{ExperimentConfig, LayerRecord, RunResult, ShrinkRatio, Snapshot};
use crate::visualization::text_plots::histogram_counts;
use crate::visualization::{histogram, plot_layer_series, run_summary, snapshot_histograms, Series};

fn relu_result(layers: usize) -> RunResult {
    let records = (1..=layers)
        .map(|l| LayerRecord {
            layer_index: l,
            x_ex2: 1.0,
            z_ex2: 1.0,
            a_ex2: 0.5,
            relu_ex2_ratio: ShrinkRatio::Defined(0.5),
            zero_frac: 0.5,
        })
        .collect();
    let mut snapshots = BTreeMap::new();
    snapshots.insert(
        1,
        Snapshot {
            layer_index: 1,
            z_samples: vec![-1.0, 0.0, 1.0],
            a_samples: vec![0.0, 0.0, 1.0],
        },
    );
    RunResult {
        config: ExperimentConfig::new("C) He + ReLU", WeightInit::He, Activation::Relu),
        weight_init: WeightInit::He,
        activation: Activation::Relu,
        records,
        snapshots,
    }
}

#[test]
fn test_histogram_counts_cover_all_values() {
    let values = [0.0f32, 0.1, 0.5, 0.9, 1.0];
    let counts = histogram_counts(&values, 4, 0.0, 1.0);
    assert_eq!(counts.iter().sum::<usize>(), values.len());
    assert_eq!(counts[3], 2);
}

#[test]
fn test_histogram_edge_cases() {
    assert!(histogram(&[], 10).contains("No data"));
    assert!(histogram(&[1.0, 1.0], 10).contains("All 2 values"));
    assert_eq!(histogram(&[0.0, 1.0, 2.0], 3).lines().count(), 3);
}

#[test]
fn test_layer_series_plot() {
    let series = vec![
        Series::from_values("a", &[1.0, 0.5, 0.25, 0.125]),
        Series::new("b", vec![Some(1.0), None, Some(1.0), Some(1.0)]),
    ];
    let plot = plot_layer_series(&series, "E[a^2]", 40, 10, true);
    assert!(plot.starts_with("E[a^2]\n"));
    assert!(plot.contains("(log scale)"));
    assert!(plot.contains("* a"));
    assert!(plot.contains("o b"));
}

#[test]
fn test_layer_series_plot_without_data() {
    let plot = plot_layer_series(&[], "empty", 40, 10, false);
    assert!(plot.contains("No data"));
}

#[test]
fn test_run_summary_reports_relu_means() {
    let summary = run_summary(&relu_result(5));
    assert!(summary.contains("w_init=he, act=relu"));
    assert!(summary.contains("[L01]"));
    assert!(summary.contains("[L03]"));
    assert!(!summary.contains("[L04]"));
    assert!(summary.contains("[L05]"));
    assert!(summary.contains("mean(E[a^2]/E[z^2]) over layers = 0.5000"));
}

#[test]
fn test_snapshot_histograms_lists_both_tensors() {
    let text = snapshot_histograms(&relu_result(2), 5);
    assert!(text.contains("layer=1  z (pre-activation)"));
    assert!(text.contains("layer=1  a (activation)"));
}
