use std::collections::BTreeMap;

use crate::activations::Activation;
use crate::layers::WeightInit;
use crate::propagation::{ExperimentConfig, LayerRecord, RunResult, ShrinkRatio, Snapshot};
use crate::visualization::{draw_histograms, draw_layer_chart, Series};

fn he_relu_result() -> RunResult {
    let records = (1..=3)
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
    for layer in [1, 3] {
        snapshots.insert(
            layer,
            Snapshot {
                layer_index: layer,
                z_samples: vec![-1.5, -0.5, 0.0, 0.5, 1.5],
                a_samples: vec![0.0, 0.0, 0.0, 0.5, 1.5],
            },
        );
    }
    RunResult {
        config: ExperimentConfig::new("C) He + ReLU", WeightInit::He, Activation::Relu),
        weight_init: WeightInit::He,
        activation: Activation::Relu,
        records,
        snapshots,
    }
}

#[test]
fn test_histogram_figure_is_svg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hist.svg");
    draw_histograms(&he_relu_result(), 10, &path).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("layer=3"));
}

#[test]
fn test_log_chart_skips_non_positive_and_undefined_points() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ex2.svg");
    let series = vec![
        Series::from_values("decaying", &[1.0, 0.5, 0.25, 0.0]),
        Series::new("gaps", vec![Some(1.0), None, Some(0.9), None]),
    ];
    draw_layer_chart(&series, "E[a^2]", "E[a^2]", true, &path).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("decaying"));
    assert!(svg.contains("gaps"));
}

#[test]
fn test_chart_without_points_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.svg");
    draw_layer_chart(&[Series::new("undefined", vec![None, None])], "ratio", "ratio", false, &path).unwrap();
    assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));
}
