//! # Monte-Carlo trajectory search
//!
//! Draw a large number of random [`LinearTrajectory`]s, walk each through a
//! [`Cube`], and score it with the noise model. The search is configured by
//! [`SearchParams`] and returns a [`SearchOutcome`]: one [`ScoredTrajectory`] per draw,
//! indexed by draw order, and the CPU time spent in evaluation.
//!
//! ## Sampling
//! -----------------
//! * Slopes: a `(x_slope, y_slope)` pair from a
//!   [`SlopeDistribution`](crate::slope_distribution::SlopeDistribution).
//! * Intercepts: integer positions drawn uniformly in `[0, size_x)` and `[0, size_y)`,
//!   referenced to frame 0.
//!
//! ## Parallel execution
//! -----------------
//! The index range `[0, N)` is cut into `num_threads` contiguous blocks, evaluated on a
//! dedicated pool of `num_threads` workers. Block `w` owns a
//! [`StdRng`](rand::rngs::StdRng) seeded with `base_seed + w` and draws its indices in
//! order, so the results array only depends on `(N, num_threads, base_seed, distribution)`
//! and never on scheduling. Each block writes the disjoint slice of the pre-sized results
//! it owns; evaluation times are summed per block and reduced after the parallel region.
//!
//! ```text
//! [0 ........ N)
//!  ├─ block 0: seed = base_seed + 0 ─► records[0 .. c)
//!  ├─ block 1: seed = base_seed + 1 ─► records[c .. 2c)
//!  └─ ...
//! ```
//!
//! ## Progress UI (feature: `progress`)
//! -----------------
//! With the `progress` feature a live progress bar (via `indicatif`) counts evaluated
//! trajectories across all workers.
//!
//! ## Example
//! -----------------
//! ```rust
//! use cubescan::cube::{Cube, FrameMetadata};
//! use cubescan::search::{shoot_trajectories, SearchParams};
//! use cubescan::slope_distribution::SlopeSampler;
//!
//! # fn run() -> Result<(), cubescan::cubescan_errors::CubeScanError> {
//! let pixels = vec![1.0_f32; 64 * 64 * 8];
//! let cube = Cube::new(64, 64, 8, &pixels, FrameMetadata::uniform(8))?;
//! let params = SearchParams::builder()
//!     .num_trajectories(1_000)
//!     .num_threads(4)
//!     .build()?;
//!
//! let outcome = shoot_trajectories(&cube, &SlopeSampler::default(), &params)?;
//! assert_eq!(outcome.records.len(), 1_000);
//! println!("{:#}", outcome.summary());
//! # Ok(()) }
//! ```
use std::{fmt, time::Duration};

use crate::{
    constants::{DEFAULT_NUM_TRAJECTORIES, DEFAULT_SEED},
    cube::Cube,
    cube_iterator::TrajectoryWalk,
    cubescan_errors::CubeScanError,
    report::summary::SearchSummary,
    snr::{evaluate_samples, NoiseModel, SnrInfo},
    trajectory::LinearTrajectory,
};

pub(crate) mod progress_bar;
mod shoot;

pub use shoot::shoot_trajectories;

/// Walk `trajectory` through `cube` from frame 0 and score it.
///
/// See also
/// ------------
/// * [`TrajectoryWalk`] – The per-frame traversal.
/// * [`evaluate_samples`] – The reduction into an [`SnrInfo`].
pub fn evaluate_trajectory(
    cube: &Cube<'_>,
    trajectory: LinearTrajectory,
    model: &NoiseModel,
) -> SnrInfo {
    evaluate_samples(TrajectoryWalk::new(cube, trajectory), model)
}

/// Score of one sampled trajectory.
///
/// Fields
/// -----------------
/// * `id` – draw index of the trajectory, `0..N`.
/// * `trajectory` – the sampled motion vector.
/// * `snr` – signal-to-noise ratio (may be `NaN` for an all-`NaN` trajectory).
/// * `signal` – summed pixel values.
/// * `frame_hits` – number of frames with a usable pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoredTrajectory {
    pub id: usize,
    pub trajectory: LinearTrajectory,
    pub snr: f64,
    pub signal: f64,
    pub frame_hits: u32,
}

impl ScoredTrajectory {
    pub fn new(id: usize, trajectory: LinearTrajectory, info: SnrInfo) -> Self {
        ScoredTrajectory {
            id,
            trajectory,
            snr: info.snr,
            signal: info.signal,
            frame_hits: info.frame_hits,
        }
    }

    /// The score part of the record.
    pub fn snr_info(&self) -> SnrInfo {
        SnrInfo {
            snr: self.snr,
            signal: self.signal,
            frame_hits: self.frame_hits,
        }
    }
}

/// Result of a full search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Evaluation time summed over all workers.
    pub total_eval_time: Duration,
    /// One record per draw, `records[i].id == i`.
    pub records: Vec<ScoredTrajectory>,
}

impl SearchOutcome {
    /// Count and throughput of the search.
    pub fn summary(&self) -> SearchSummary {
        SearchSummary::new(self.records.len(), self.total_eval_time)
    }
}

/// Configuration of a Monte-Carlo search.
///
/// Fields
/// -----------------
/// * `num_trajectories` – number of random trajectories to draw (`N`).
/// * `num_threads` – size of the worker pool, also the number of random streams.
/// * `base_seed` – worker `w` seeds its generator with `base_seed + w`.
/// * `noise_model` – detector parameters used to score every trajectory.
///
/// Defaults
/// -----------------
/// * `num_trajectories`: 100 000
/// * `num_threads`: the default rayon thread count
/// * `base_seed`: 123
/// * `noise_model`: [`NoiseModel::default`]
///
/// Two searches with equal `num_trajectories`, `num_threads`, `base_seed` and slope
/// distribution produce identical records.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub num_trajectories: usize,
    pub num_threads: usize,
    pub base_seed: u64,
    pub noise_model: NoiseModel,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            num_trajectories: DEFAULT_NUM_TRAJECTORIES,
            num_threads: rayon::current_num_threads(),
            base_seed: DEFAULT_SEED,
            noise_model: NoiseModel::default(),
        }
    }
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`SearchParamsBuilder`] initialized with the defaults.
    ///
    /// ```rust
    /// use cubescan::search::SearchParams;
    ///
    /// let params = SearchParams::builder()
    ///     .num_trajectories(5_000)
    ///     .num_threads(8)
    ///     .base_seed(7)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.num_threads, 8);
    /// ```
    pub fn builder() -> SearchParamsBuilder {
        SearchParamsBuilder::new()
    }
}

/// Builder for [`SearchParams`], with validation.
#[derive(Debug, Clone)]
pub struct SearchParamsBuilder {
    params: SearchParams,
}

impl Default for SearchParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: SearchParams::default(),
        }
    }

    pub fn num_trajectories(mut self, v: usize) -> Self {
        self.params.num_trajectories = v;
        self
    }
    pub fn num_threads(mut self, v: usize) -> Self {
        self.params.num_threads = v;
        self
    }
    pub fn base_seed(mut self, v: u64) -> Self {
        self.params.base_seed = v;
        self
    }
    pub fn noise_model(mut self, v: NoiseModel) -> Self {
        self.params.noise_model = v;
        self
    }

    /// Validate and return the parameters.
    ///
    /// Return
    /// ----------
    /// * [`CubeScanError::InvalidSearchParameter`] if `num_trajectories` or `num_threads`
    ///   is zero, or if the noise model is invalid.
    pub fn build(self) -> Result<SearchParams, CubeScanError> {
        let p = &self.params;
        if p.num_trajectories == 0 {
            return Err(CubeScanError::InvalidSearchParameter(
                "num_trajectories must be >= 1".into(),
            ));
        }
        if p.num_threads == 0 {
            return Err(CubeScanError::InvalidSearchParameter(
                "num_threads must be >= 1".into(),
            ));
        }
        p.noise_model.validate()?;
        Ok(self.params)
    }
}

impl fmt::Display for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Trajectory search parameters")?;
            writeln!(f, "----------------------------")?;
            writeln!(f, "  num_trajectories = {}", self.num_trajectories)?;
            writeln!(f, "  num_threads      = {}", self.num_threads)?;
            writeln!(f, "  base_seed        = {}", self.base_seed)?;
            writeln!(f, "  dark_noise_rate  = {}", self.noise_model.dark_noise_rate)?;
            writeln!(f, "  readout_noise    = {}", self.noise_model.readout_noise)?;
            write!(f, "  background       = {:?}", self.noise_model.background)
        } else {
            write!(
                f,
                "SearchParams(num_trajectories={}, num_threads={}, base_seed={})",
                self.num_trajectories, self.num_threads, self.base_seed
            )
        }
    }
}
