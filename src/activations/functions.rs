use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpreadError};

/// The activation functions a propagation pattern can apply after each linear layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Identity,
    Relu,
}

impl Activation {
    /// Look up an activation by name.
    pub fn resolve(name: &str) -> Result<Self> {
        name.parse()
    }

    /// Apply the activation function to a batch in-place.
    pub fn apply_batch(&self, inputs: &mut Array2<f32>) {
        match self {
            Activation::Identity => {}
            Activation::Relu => {
                inputs.mapv_inplace(|v| v.max(0.0));
            }
        }
    }

    /// Apply the activation function to a batch, returning a new array of the same shape.
    pub fn apply(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        let mut outputs = inputs.to_owned();
        self.apply_batch(&mut outputs);
        outputs
    }

    /// Fraction of outputs that are exactly zero.
    ///
    /// Only defined for activations that clamp to zero; `None` otherwise.
    pub fn zero_fraction(&self, outputs: ArrayView2<f32>) -> Option<f64> {
        match self {
            Activation::Identity => None,
            Activation::Relu => {
                let total = outputs.len();
                if total == 0 {
                    return Some(0.0);
                }
                let zeros = outputs.iter().filter(|&&v| v == 0.0).count();
                Some(zeros as f64 / total as f64)
            }
        }
    }

    pub fn is_relu(&self) -> bool {
        matches!(self, Activation::Relu)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Activation::Identity => "identity",
            Activation::Relu => "relu",
        }
    }
}

impl FromStr for Activation {
    type Err = SpreadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" => Ok(Activation::Identity),
            "relu" => Ok(Activation::Relu),
            _ => Err(SpreadError::UnsupportedActivation(s.to_string())),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
