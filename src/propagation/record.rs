use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::activations::Activation;
use crate::layers::WeightInit;
use crate::metrics::RunStatistics;

use super::config::ExperimentConfig;

/// `E[a^2] / E[z^2]` for one layer.
///
/// `Undefined` marks a layer whose pre-activation second moment was zero.
/// It serializes as the string `"undefined"` so it can never be mistaken
/// for a numeric value downstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShrinkRatio {
    Defined(f64),
    Undefined,
}

impl ShrinkRatio {
    /// Ratio of activation to pre-activation second moments.
    pub fn from_moments(a_ex2: f64, z_ex2: f64) -> Self {
        if z_ex2 > 0.0 {
            ShrinkRatio::Defined(a_ex2 / z_ex2)
        } else {
            ShrinkRatio::Undefined
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            ShrinkRatio::Defined(v) => Some(*v),
            ShrinkRatio::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, ShrinkRatio::Defined(_))
    }
}

impl fmt::Display for ShrinkRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShrinkRatio::Defined(v) => match f.precision() {
                Some(p) => write!(f, "{:.*}", p, v),
                None => write!(f, "{}", v),
            },
            ShrinkRatio::Undefined => f.write_str("undefined"),
        }
    }
}

impl Serialize for ShrinkRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ShrinkRatio::Defined(v) => serializer.serialize_f64(*v),
            ShrinkRatio::Undefined => serializer.serialize_str("undefined"),
        }
    }
}

impl<'de> Deserialize<'de> for ShrinkRatio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(ShrinkRatio::Defined(v)),
            Raw::Text(s) if s == "undefined" => Ok(ShrinkRatio::Undefined),
            Raw::Text(s) => Err(serde::de::Error::custom(format!(
                "expected a number or \"undefined\", got \"{}\"",
                s
            ))),
        }
    }
}

/// Summary of one layer of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    /// 1-based layer index
    pub layer_index: usize,
    pub x_ex2: f64,
    pub z_ex2: f64,
    pub a_ex2: f64,
    pub relu_ex2_ratio: ShrinkRatio,
    /// Fraction of exactly-zero activations; always 0 for non-clamping activations
    pub zero_frac: f64,
}

/// Sampled pre-activation and activation values at one layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub layer_index: usize,
    pub z_samples: Vec<f32>,
    pub a_samples: Vec<f32>,
}

/// Everything one pattern produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub config: ExperimentConfig,
    pub weight_init: WeightInit,
    pub activation: Activation,
    pub records: Vec<LayerRecord>,
    #[serde(skip)]
    pub snapshots: BTreeMap<usize, Snapshot>,
}

impl RunResult {
    pub fn statistics(&self) -> RunStatistics {
        RunStatistics::from_records(&self.records)
    }

    pub fn record(&self, layer_index: usize) -> Option<&LayerRecord> {
        layer_index
            .checked_sub(1)
            .and_then(|i| self.records.get(i))
    }

    pub fn a_ex2_series(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.a_ex2).collect()
    }

    pub fn shrink_ratio_series(&self) -> Vec<Option<f64>> {
        self.records.iter().map(|r| r.relu_ex2_ratio.value()).collect()
    }

    pub fn zero_frac_series(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.zero_frac).collect()
    }
}
