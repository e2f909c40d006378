use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpreadError};

/// Weight variance scaling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightInit {
    /// Xavier/Glorot normal scaling, `Var(w) = 1/fan_in`
    Xavier,

    /// He/Kaiming normal scaling, `Var(w) = 2/fan_in` (for ReLU)
    He,
}

impl WeightInit {
    /// Standard deviation applied to unit-normal draws for a layer with `fan_in` inputs.
    pub fn std_for(&self, fan_in: usize) -> f32 {
        let fan_in = fan_in as f32;
        match self {
            WeightInit::Xavier => 1.0 / fan_in.sqrt(),
            WeightInit::He => (2.0 / fan_in).sqrt(),
        }
    }

    /// Draw a fresh `(fan_out, fan_in)` weight matrix.
    ///
    /// Entries are independent standard normals scaled by [`WeightInit::std_for`].
    /// Each call consumes new randomness, so matrices are never shared between layers.
    pub fn initialize_weights<R: Rng + ?Sized>(
        &self,
        shape: (usize, usize),
        rng: &mut R,
    ) -> Array2<f32> {
        let (fan_out, fan_in) = shape;
        let std = self.std_for(fan_in);
        let mut weights = Array2::<f32>::random_using((fan_out, fan_in), StandardNormal, rng);
        weights.mapv_inplace(|w| w * std);
        weights
    }

    pub fn name(&self) -> &'static str {
        match self {
            WeightInit::Xavier => "xavier",
            WeightInit::He => "he",
        }
    }
}

impl FromStr for WeightInit {
    type Err = SpreadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xavier" => Ok(WeightInit::Xavier),
            "he" => Ok(WeightInit::He),
            _ => Err(SpreadError::UnsupportedMode(s.to_string())),
        }
    }
}

impl fmt::Display for WeightInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve an initialization mode by name and return its weight standard deviation.
pub fn std_for(mode: &str, fan_in: usize) -> Result<f32> {
    Ok(mode.parse::<WeightInit>()?.std_for(fan_in))
}
