pub mod statistics;

pub use statistics::{MomentStats, RunStatistics};
