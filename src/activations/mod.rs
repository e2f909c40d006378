//! # Activation Functions Module
//!
//! The activations applied after each linear layer of a propagation pattern.
//!
//! ## Available Activations
//!
//! - **Identity**: no transformation, second moment passes through unchanged
//! - **ReLU** (Rectified Linear Unit): `max(0, x)`, halves the second moment of
//!   a zero-mean symmetric input and zeroes about half of the units
//!
//! ## Usage Example
//!
//! ```rust
//! use spreadcheck::activations::Activation;
//! use ndarray::array;
//!
//! let relu = Activation::resolve("relu").unwrap();
//! let a = relu.apply(array![[1.0, -0.5], [0.0, 2.0]].view());
//! assert_eq!(a, array![[1.0, 0.0], [0.0, 2.0]]);
//! assert_eq!(relu.zero_fraction(a.view()), Some(0.5));
//! ```
//!
//! Zero-fraction tracking is a capability of the variant: it is `None` for
//! activations that never clamp to zero.

pub mod functions;

pub use functions::Activation;
