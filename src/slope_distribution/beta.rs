use rand::{distr::Distribution, Rng};
use rand_distr::Beta;

use super::SlopeDistribution;
use crate::{
    constants::{DEFAULT_BETA_ALPHA, DEFAULT_BETA_BETA, DEFAULT_SLOPE_MAX, DEFAULT_SLOPE_MIN},
    cubescan_errors::CubeScanError,
};

/// Slopes drawn independently from a Beta(α, β) law mapped onto `[min, max]`:
///
/// ```text
/// slope = min + (max − min) · Beta(α, β)
/// ```
#[derive(Debug, Clone)]
pub struct BetaSlopes {
    beta: Beta<f64>,
    alpha: f64,
    beta_param: f64,
    min: f64,
    max: f64,
}

impl Default for BetaSlopes {
    fn default() -> Self {
        BetaSlopes {
            beta: Beta::new(DEFAULT_BETA_ALPHA, DEFAULT_BETA_BETA)
                .unwrap_or_else(|_| unreachable!("default Beta parameters are positive")),
            alpha: DEFAULT_BETA_ALPHA,
            beta_param: DEFAULT_BETA_BETA,
            min: DEFAULT_SLOPE_MIN,
            max: DEFAULT_SLOPE_MAX,
        }
    }
}

impl BetaSlopes {
    /// Build a Beta slope distribution.
    ///
    /// Arguments
    /// -----------------
    /// * `alpha`, `beta`: shape parameters, both strictly positive.
    /// * `min`, `max`: slope range, finite with `min < max`.
    ///
    /// Return
    /// ----------
    /// * The distribution, or [`CubeScanError::InvalidSlopeDistribution`].
    pub fn new(alpha: f64, beta: f64, min: f64, max: f64) -> Result<Self, CubeScanError> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(CubeScanError::InvalidSlopeDistribution(format!(
                "slope range [{min}, {max}] is empty or not finite"
            )));
        }
        Ok(BetaSlopes {
            beta: Beta::new(alpha, beta)?,
            alpha,
            beta_param: beta,
            min,
            max,
        })
    }

    /// Shape parameters `(α, β)`.
    pub fn shape(&self) -> (f64, f64) {
        (self.alpha, self.beta_param)
    }

    /// Slope range `(min, max)`.
    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    #[inline]
    fn sample_one<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.min + (self.max - self.min) * self.beta.sample(rng)
    }
}

impl SlopeDistribution for BetaSlopes {
    #[inline]
    fn sample_slopes<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        let x_slope = self.sample_one(rng);
        let y_slope = self.sample_one(rng);
        (x_slope, y_slope)
    }
}
