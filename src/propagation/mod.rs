//! Layer-by-layer propagation of random signals and the records it produces.

pub mod config;
pub mod engine;
pub mod record;

pub use config::{ExperimentConfig, PropagationSettings};
pub use engine::{layer_record, run, RunShape};
pub use record::{LayerRecord, RunResult, ShrinkRatio, Snapshot};
