//! Runs every configured pattern and collects their results.

use rand::Rng;
use tracing::{info, warn};

use crate::error::{Result, SpreadError};
use crate::propagation::{self, ExperimentConfig, PropagationSettings, RunResult, RunShape};

/// Result of one pattern. A failed pattern keeps its error; the others still run.
#[derive(Debug)]
pub struct PatternOutcome {
    pub name: String,
    pub result: Result<RunResult>,
}

impl PatternOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of all patterns, in the order they were configured
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<PatternOutcome>,
}

impl RunReport {
    /// Successful results, in configuration order.
    pub fn results(&self) -> impl Iterator<Item = &RunResult> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Failed patterns with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &SpreadError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
    }

    pub fn get(&self, name: &str) -> Option<&RunResult> {
        self.outcomes
            .iter()
            .find(|o| o.name == name)
            .and_then(|o| o.result.as_ref().ok())
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(PatternOutcome::is_ok)
    }
}

/// Run each pattern in order against the same shape, drawing from one generator.
///
/// Patterns share no tensors; each draws its own input and weights from the
/// next stretch of `rng`'s stream. A pattern that fails is recorded and the
/// remaining patterns still run.
pub fn run_all<R: Rng + ?Sized>(configs: &[ExperimentConfig], shape: &RunShape, rng: &mut R) -> RunReport {
    let mut outcomes = Vec::with_capacity(configs.len());

    for config in configs {
        let result = propagation::run(config, shape, rng);
        match &result {
            Ok(run) => info!(pattern = %config.name, layers = run.records.len(), "pattern finished"),
            Err(e) => warn!(pattern = %config.name, error = %e, "pattern failed"),
        }
        outcomes.push(PatternOutcome {
            name: config.name.clone(),
            result,
        });
    }

    RunReport { outcomes }
}

/// Validate `settings` and run all of its patterns.
///
/// Invalid settings abort before anything runs; per-pattern failures do not.
pub fn run_settings<R: Rng + ?Sized>(settings: &PropagationSettings, rng: &mut R) -> Result<RunReport> {
    settings.validate()?;
    let shape = RunShape::from(settings);
    Ok(run_all(&settings.patterns, &shape, rng))
}
