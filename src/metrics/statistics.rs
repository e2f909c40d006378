use ndarray::{ArrayBase, Data, Dimension};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpreadError};
use crate::propagation::record::LayerRecord;

/// First and second moments of a tensor, over all of its elements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentStats {
    pub mean: f64,
    /// Second raw moment, `E[x^2]`
    pub ex2: f64,
    /// Population variance (no Bessel correction)
    pub var: f64,
}

impl MomentStats {
    /// Compute moments of any-dimensional `f32` array, accumulating in `f64`.
    pub fn from_array<S, D>(array: &ArrayBase<S, D>) -> Result<Self>
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        let count = array.len();
        if count == 0 {
            return Err(SpreadError::EmptyTensor);
        }
        let n = count as f64;

        let (sum, sum_sq) = array.iter().fold((0.0f64, 0.0f64), |(s, sq), &v| {
            let v = v as f64;
            (s + v, sq + v * v)
        });
        let mean = sum / n;
        let ex2 = sum_sq / n;

        let var = array
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;

        Ok(MomentStats { mean, ex2, var })
    }

    /// Compute moments from a slice of values
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        Self::from_array(&ndarray::ArrayView1::from(values))
    }
}

/// Aggregates over the layer records of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub layers: usize,
    /// Mean of `E[a^2]/E[z^2]` over layers where it is defined
    pub mean_shrink_ratio: Option<f64>,
    pub undefined_ratio_layers: usize,
    pub mean_zero_frac: f64,
    pub first_a_ex2: f64,
    pub last_a_ex2: f64,
    /// Geometric mean of the per-layer factor `a_ex2[l] / a_ex2[l-1]`
    pub mean_decay_factor: Option<f64>,
}

impl RunStatistics {
    pub fn from_records(records: &[LayerRecord]) -> Self {
        let defined: Vec<f64> = records
            .iter()
            .filter_map(|r| r.relu_ex2_ratio.value())
            .collect();
        let mean_shrink_ratio = mean(&defined);

        let zero_fracs: Vec<f64> = records.iter().map(|r| r.zero_frac).collect();
        let mean_zero_frac = mean(&zero_fracs).unwrap_or(0.0);

        let first_a_ex2 = records.first().map(|r| r.a_ex2).unwrap_or(0.0);
        let last_a_ex2 = records.last().map(|r| r.a_ex2).unwrap_or(0.0);

        let mean_decay_factor = if records.len() >= 2 && first_a_ex2 > 0.0 && last_a_ex2 > 0.0 {
            let steps = (records.len() - 1) as f64;
            Some((last_a_ex2 / first_a_ex2).powf(1.0 / steps))
        } else {
            None
        };

        RunStatistics {
            layers: records.len(),
            mean_shrink_ratio,
            undefined_ratio_layers: records.len() - defined.len(),
            mean_zero_frac,
            first_a_ex2,
            last_a_ex2,
            mean_decay_factor,
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
