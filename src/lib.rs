//! Monte-Carlo search for faint moving sources in a time-ordered image cube.
//!
//! Random straight-line trajectories are walked through the frames of a [`Cube`], the pixel
//! values along each one are combined into a signal-to-noise ratio, and every draw is
//! reported with its parameters and score. See [`search`] for the driver and [`snr`] for the
//! noise model.
pub mod config;
pub mod constants;
pub mod cube;
pub mod cube_iterator;
pub mod cubescan_errors;
pub mod report;
pub mod search;
pub mod slope_distribution;
pub mod snr;
pub mod trajectory;

pub use cube::{Cube, FrameMetadata};
pub use cubescan_errors::CubeScanError;
pub use search::{evaluate_trajectory, shoot_trajectories, ScoredTrajectory, SearchParams};
pub use slope_distribution::SlopeSampler;
pub use trajectory::LinearTrajectory;
