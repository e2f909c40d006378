pub mod initialization;

pub use initialization::{std_for, WeightInit};
