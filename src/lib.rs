//! # Spreadcheck - Signal Propagation Through Random Linear Layers
//!
//! Spreadcheck pushes a batch of standard-normal inputs through a stack of
//! freshly initialized, fixed-width linear layers and records, layer by layer,
//! how the second moment of the signal evolves. It is used to confirm two
//! well-known facts empirically:
//!
//! - Xavier scaling preserves `E[x^2]` through identity layers, but ReLU halves
//!   it at every layer; He scaling compensates for that halving.
//! - ReLU zeroes about half of the units of every layer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use spreadcheck::driver::run_settings;
//! use spreadcheck::propagation::PropagationSettings;
//! use spreadcheck::visualization::run_summary;
//!
//! let settings = PropagationSettings::default().with_depth(10).with_width(256).with_batch(1024);
//! let mut rng = StdRng::seed_from_u64(settings.seed);
//! let report = run_settings(&settings, &mut rng).unwrap();
//! for result in report.results() {
//!     println!("{}", run_summary(result));
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Identity and ReLU activations
//! - [`driver`] - Runs every configured pattern, isolating failures
//! - [`error`] - Error types and result handling
//! - [`layers`] - Xavier/He weight scaling and weight drawing
//! - [`metrics`] - Moment statistics and per-run aggregates
//! - [`propagation`] - Pattern configuration, layer records and the propagation engine
//! - [`sampling`] - Bounded subsampling for histograms
//! - [`visualization`] - Text histograms, layer charts and file exports

pub mod activations;
pub mod driver;
pub mod error;
pub mod layers;
pub mod metrics;
pub mod propagation;
pub mod sampling;
pub mod visualization;

#[cfg(test)]
mod tests;
