use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::activations::Activation;
use crate::error::{Result, SpreadError};
use crate::layers::WeightInit;

/// One propagation pattern: a weight scaling mode paired with an activation.
///
/// Mode and activation are kept by name so that a misconfigured pattern
/// fails on its own when it is run, without invalidating its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub name: String,
    pub weight_init_mode: String,
    pub activation: String,
}

impl ExperimentConfig {
    pub fn new<S: Into<String>>(name: S, weight_init: WeightInit, activation: Activation) -> Self {
        ExperimentConfig {
            name: name.into(),
            weight_init_mode: weight_init.name().to_string(),
            activation: activation.name().to_string(),
        }
    }

    /// Build a pattern from raw names, without checking them.
    pub fn from_names<S: Into<String>>(name: S, weight_init_mode: S, activation: S) -> Self {
        ExperimentConfig {
            name: name.into(),
            weight_init_mode: weight_init_mode.into(),
            activation: activation.into(),
        }
    }

    /// The three patterns compared by default.
    pub fn standard_patterns() -> Vec<Self> {
        vec![
            ExperimentConfig::new("A) Xavier + Identity", WeightInit::Xavier, Activation::Identity),
            ExperimentConfig::new("B) Xavier + ReLU", WeightInit::Xavier, Activation::Relu),
            ExperimentConfig::new("C) He + ReLU", WeightInit::He, Activation::Relu),
        ]
    }

    /// Resolve both names to their typed variants.
    pub fn resolve(&self) -> Result<(WeightInit, Activation)> {
        let weight_init = self.weight_init_mode.parse::<WeightInit>()?;
        let activation = Activation::resolve(&self.activation)?;
        Ok((weight_init, activation))
    }
}

/// Parameters shared by every pattern of an invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationSettings {
    pub depth: usize,
    pub width: usize,
    pub batch: usize,
    /// Layers (1-based) whose pre-activation and activation values are sampled
    pub snapshot_layers: BTreeSet<usize>,
    /// Maximum number of values kept per sampled tensor
    pub sample_cap: usize,
    pub seed: u64,
    pub histogram_bins: usize,
    pub output_dir: PathBuf,
    pub patterns: Vec<ExperimentConfig>,
}

impl Default for PropagationSettings {
    fn default() -> Self {
        PropagationSettings {
            depth: 20,
            width: 1024,
            batch: 8192,
            snapshot_layers: [1, 5, 10, 20].into_iter().collect(),
            sample_cap: 200_000,
            seed: 0,
            histogram_bins: 60,
            output_dir: PathBuf::from("figures"),
            patterns: ExperimentConfig::standard_patterns(),
        }
    }
}

impl PropagationSettings {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings: PropagationSettings = serde_json::from_str(&text)?;
        Ok(settings)
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_batch(mut self, batch: usize) -> Self {
        self.batch = batch;
        self
    }

    pub fn with_snapshot_layers<I: IntoIterator<Item = usize>>(mut self, layers: I) -> Self {
        self.snapshot_layers = layers.into_iter().collect();
        self
    }

    pub fn with_sample_cap(mut self, sample_cap: usize) -> Self {
        self.sample_cap = sample_cap;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins;
        self
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_patterns(mut self, patterns: Vec<ExperimentConfig>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Check the shape parameters and the pattern list.
    ///
    /// Pattern names are checked for uniqueness only; unknown modes and
    /// activations are reported per pattern when it runs.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("depth", self.depth),
            ("width", self.width),
            ("batch", self.batch),
            ("sample_cap", self.sample_cap),
            ("histogram_bins", self.histogram_bins),
        ] {
            if value == 0 {
                return Err(SpreadError::invalid_parameter(name, "must be positive"));
            }
        }

        if let Some(&layer) = self
            .snapshot_layers
            .iter()
            .find(|&&l| l == 0 || l > self.depth)
        {
            return Err(SpreadError::InvalidParameter {
                name: "snapshot_layers".to_string(),
                reason: format!("layer {} outside 1..={}", layer, self.depth),
            });
        }

        if self.patterns.is_empty() {
            return Err(SpreadError::invalid_parameter("patterns", "at least one pattern is required"));
        }

        let mut seen = HashSet::new();
        for pattern in &self.patterns {
            if !seen.insert(pattern.name.as_str()) {
                return Err(SpreadError::InvalidParameter {
                    name: "patterns".to_string(),
                    reason: format!("duplicate pattern name '{}'", pattern.name),
                });
            }
        }

        Ok(())
    }
}
