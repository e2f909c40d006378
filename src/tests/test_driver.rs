use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::driver::{run_all, run_settings};
use crate::error::SpreadError;
use crate::propagation::{ExperimentConfig, PropagationSettings, RunShape};

#[test]
fn test_failed_pattern_does_not_stop_others() {
    let mut configs = ExperimentConfig::standard_patterns();
    configs.insert(1, ExperimentConfig::from_names("broken", "lecun", "relu"));

    let shape = RunShape::new(32, 3, 64);
    let report = run_all(&configs, &shape, &mut StdRng::seed_from_u64(0));

    assert_eq!(report.len(), 4);
    assert!(!report.all_succeeded());
    let names: Vec<&str> = report.results().map(|r| r.config.name.as_str()).collect();
    assert_eq!(names, vec!["A) Xavier + Identity", "B) Xavier + ReLU", "C) He + ReLU"]);

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "broken");
    assert!(matches!(failures[0].1, SpreadError::UnsupportedMode(_)));
    assert!(report.get("broken").is_none());
}

#[test]
fn test_lookup_by_name() {
    let configs = ExperimentConfig::standard_patterns();
    let report = run_all(&configs, &RunShape::new(16, 2, 32), &mut StdRng::seed_from_u64(4));
    let he = report.get("C) He + ReLU").unwrap();
    assert!(he.activation.is_relu());
    assert_eq!(he.records.len(), 2);
}

#[test]
fn test_patterns_draw_independent_randomness() {
    let config = ExperimentConfig::standard_patterns().remove(2);
    let mut second = config.clone();
    second.name = "C) He + ReLU (again)".to_string();

    let report = run_all(&[config, second], &RunShape::new(16, 2, 32), &mut StdRng::seed_from_u64(4));
    let results: Vec<_> = report.results().collect();
    assert_ne!(results[0].records, results[1].records);
}

#[test]
fn test_invalid_settings_abort() {
    let settings = PropagationSettings::default().with_depth(5);
    // Default snapshot layers include 10 and 20
    let err = run_settings(&settings, &mut StdRng::seed_from_u64(0)).unwrap_err();
    assert!(matches!(err, SpreadError::InvalidParameter { .. }));
}

#[test]
fn test_duplicate_pattern_names_rejected() {
    let patterns = vec![
        ExperimentConfig::from_names("p", "he", "relu"),
        ExperimentConfig::from_names("p", "xavier", "relu"),
    ];
    let settings = PropagationSettings::default().with_patterns(patterns);
    assert!(settings.validate().is_err());
}

#[test]
fn test_default_settings_are_valid() {
    let settings = PropagationSettings::default();
    assert!(settings.validate().is_ok());
    assert_eq!(settings.patterns.len(), 3);
    assert_eq!(settings.snapshot_layers.iter().copied().collect::<Vec<_>>(), vec![1, 5, 10, 20]);
}

#[test]
fn test_settings_json_defaults_missing_fields() {
    let settings: PropagationSettings = serde_json::from_str(r#"{"depth": 4, "snapshot_layers": [2]}"#).unwrap();
    assert_eq!(settings.depth, 4);
    assert_eq!(settings.width, 1024);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_histogram_bins_override() {
    let settings = PropagationSettings::default().with_histogram_bins(30);
    assert_eq!(settings.histogram_bins, 30);
    assert!(settings.validate().is_ok());

    let err = PropagationSettings::default().with_histogram_bins(0).validate().unwrap_err();
    match err {
        SpreadError::InvalidParameter { name, .. } => assert_eq!(name, "histogram_bins"),
        other => panic!("unexpected error: {other:?}"),
    }
}
