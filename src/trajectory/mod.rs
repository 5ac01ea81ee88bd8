//! Trajectory store.
//!
//! Holds the kept position samples of every node and answers interpolated
//! position queries inside each node's recorded time range.

pub mod interpolation;
pub mod store;

pub use interpolation::interpolate;
pub use store::{SamplingPolicy, Trajectory, TrajectoryBuilder, TrajectoryStore};
