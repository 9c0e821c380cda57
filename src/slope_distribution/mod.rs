//! # Slope distributions
//!
//! The Monte-Carlo search draws the `(x_slope, y_slope)` pair of every trajectory from a
//! [`SlopeDistribution`]. Two strategies are provided:
//!
//! * [`BetaSlopes`] – parametric: each slope is a Beta(α, β) variate mapped linearly onto a
//!   slope range. Default: Beta(3, 2) over `[-1, 1]`.
//! * [`EmpiricalSlopes`] – a weighted list of slope pairs read from a file (e.g. the apparent
//!   motions of known objects); pairs are drawn with probability proportional to their weight.
//!
//! The strategy is chosen once, at startup, as a [`SlopeSampler`]; the driver is generic over
//! the trait, so a custom distribution can be plugged in as well.
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use cubescan::slope_distribution::{SlopeDistribution, SlopeSampler};
//!
//! let sampler = SlopeSampler::default();
//! let mut rng = StdRng::seed_from_u64(123);
//! let (x_slope, y_slope) = sampler.sample_slopes(&mut rng);
//! assert!((-1.0..=1.0).contains(&x_slope) && (-1.0..=1.0).contains(&y_slope));
//! ```
pub mod beta;
pub mod empirical;

pub use beta::BetaSlopes;
pub use empirical::EmpiricalSlopes;

use camino::Utf8Path;
use rand::Rng;
use tracing::info;

use crate::cubescan_errors::CubeScanError;

/// Capability of drawing a `(x_slope, y_slope)` pair from a random source.
pub trait SlopeDistribution {
    fn sample_slopes<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64);
}

/// Slope distribution selected at startup.
#[derive(Debug, Clone)]
pub enum SlopeSampler {
    Beta(BetaSlopes),
    Empirical(EmpiricalSlopes),
}

impl Default for SlopeSampler {
    fn default() -> Self {
        SlopeSampler::Beta(BetaSlopes::default())
    }
}

impl SlopeSampler {
    /// Load the empirical distribution stored at `path`, or fall back to the default
    /// Beta(3, 2) distribution when no path is given.
    pub fn from_file_or_default(path: Option<&Utf8Path>) -> Result<Self, CubeScanError> {
        match path {
            Some(path) => {
                let empirical = EmpiricalSlopes::from_file(path)?;
                info!(%path, samples = empirical.len(), "using empirical slope distribution");
                Ok(SlopeSampler::Empirical(empirical))
            }
            None => Ok(SlopeSampler::default()),
        }
    }
}

impl SlopeDistribution for SlopeSampler {
    #[inline]
    fn sample_slopes<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        match self {
            SlopeSampler::Beta(d) => d.sample_slopes(rng),
            SlopeSampler::Empirical(d) => d.sample_slopes(rng),
        }
    }
}

impl<D: SlopeDistribution> SlopeDistribution for &D {
    #[inline]
    fn sample_slopes<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        (**self).sample_slopes(rng)
    }
}
