use std::collections::{BTreeMap, BTreeSet};

use ndarray::Array2;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::{debug, info, warn};

use crate::activations::Activation;
use crate::error::{Result, SpreadError};
use crate::metrics::MomentStats;
use crate::sampling::sample_flat;

use super::config::{ExperimentConfig, PropagationSettings};
use super::record::{LayerRecord, RunResult, ShrinkRatio, Snapshot};

/// Shape and sampling parameters of a single run
#[derive(Debug, Clone, PartialEq)]
pub struct RunShape {
    pub width: usize,
    pub depth: usize,
    pub batch: usize,
    pub snapshot_layers: BTreeSet<usize>,
    pub sample_cap: usize,
}

impl RunShape {
    pub fn new(width: usize, depth: usize, batch: usize) -> Self {
        RunShape {
            width,
            depth,
            batch,
            snapshot_layers: BTreeSet::new(),
            sample_cap: 0,
        }
    }

    pub fn with_snapshots<I: IntoIterator<Item = usize>>(mut self, layers: I, sample_cap: usize) -> Self {
        self.snapshot_layers = layers.into_iter().collect();
        self.sample_cap = sample_cap;
        self
    }

    fn check(&self) -> Result<()> {
        for (name, value) in [("width", self.width), ("depth", self.depth), ("batch", self.batch)] {
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
        if !self.snapshot_layers.is_empty() && self.sample_cap == 0 {
            return Err(SpreadError::invalid_parameter("sample_cap", "must be positive when snapshots are requested"));
        }
        Ok(())
    }
}

impl From<&PropagationSettings> for RunShape {
    fn from(settings: &PropagationSettings) -> Self {
        RunShape {
            width: settings.width,
            depth: settings.depth,
            batch: settings.batch,
            snapshot_layers: settings.snapshot_layers.clone(),
            sample_cap: settings.sample_cap,
        }
    }
}

/// Summarize one layer from its input `x`, pre-activation `z` and activation `a`.
///
/// The shrink ratio is `Undefined` when `z` has a zero second moment. The zero
/// fraction is 0 for activations that never clamp to zero.
pub fn layer_record(
    layer_index: usize,
    x: &Array2<f32>,
    z: &Array2<f32>,
    a: &Array2<f32>,
    activation: Activation,
) -> Result<LayerRecord> {
    let xs = MomentStats::from_array(x)?;
    let zs = MomentStats::from_array(z)?;
    let a_stats = MomentStats::from_array(a)?;

    Ok(LayerRecord {
        layer_index,
        x_ex2: xs.ex2,
        z_ex2: zs.ex2,
        a_ex2: a_stats.ex2,
        relu_ex2_ratio: ShrinkRatio::from_moments(a_stats.ex2, zs.ex2),
        zero_frac: activation.zero_fraction(a.view()).unwrap_or(0.0),
    })
}

/// Propagate a random batch through `shape.depth` freshly initialized linear layers.
///
/// Layer `n` receives the activation output of layer `n - 1` (standard normal
/// input for layer 1). Every layer draws its own `width x width` weight matrix
/// from `rng`; matrices and intermediate tensors are dropped as soon as the
/// next layer's input is set, so only scalar records and capped snapshots
/// outlive an iteration.
///
/// Unknown initialization modes or activation names fail the run before any
/// randomness is consumed.
pub fn run<R: Rng + ?Sized>(config: &ExperimentConfig, shape: &RunShape, rng: &mut R) -> Result<RunResult> {
    let (weight_init, activation) = config.resolve()?;
    shape.check()?;

    info!(
        pattern = %config.name,
        w_init = %weight_init,
        act = %activation,
        width = shape.width,
        depth = shape.depth,
        batch = shape.batch,
        "propagating"
    );

    let mut x = Array2::<f32>::random_using((shape.batch, shape.width), StandardNormal, rng);
    let mut records = Vec::with_capacity(shape.depth);
    let mut snapshots = BTreeMap::new();

    for layer in 1..=shape.depth {
        let w = weight_init.initialize_weights((shape.width, shape.width), rng);

        let z = x.dot(&w.t());
        let a = activation.apply(z.view());

        let record = layer_record(layer, &x, &z, &a, activation)?;
        debug!(
            pattern = %config.name,
            layer,
            z_ex2 = record.z_ex2,
            a_ex2 = record.a_ex2,
            ratio = %record.relu_ex2_ratio,
            zero_frac = record.zero_frac,
            "layer"
        );
        if !record.relu_ex2_ratio.is_defined() {
            warn!(pattern = %config.name, layer, "pre-activation second moment is zero; shrink ratio undefined");
        }
        records.push(record);

        if shape.snapshot_layers.contains(&layer) {
            snapshots.insert(
                layer,
                Snapshot {
                    layer_index: layer,
                    z_samples: sample_flat(&z, shape.sample_cap, rng),
                    a_samples: sample_flat(&a, shape.sample_cap, rng),
                },
            );
        }

        x = a;
    }

    Ok(RunResult {
        config: config.clone(),
        weight_init,
        activation,
        records,
        snapshots,
    })
}
