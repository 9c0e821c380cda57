//! # Signal-to-noise evaluation of a trajectory
//!
//! Reduces the samples of one trajectory ([`CubeSample`]s produced by a
//! [`TrajectoryWalk`](crate::cube_iterator::TrajectoryWalk)) into an [`SnrInfo`]:
//! the summed signal, the number of frames hit and a signal-to-noise ratio computed with a
//! CCD noise model.
//!
//! ## Noise model
//!
//! For every non-`NaN` sample of value `v`, pixel count `n` and exposure time `e`:
//!
//! ```text
//! S += v                       (signal)
//! B += background(v) · n       (sky background)
//! R += n · σ_read² / e         (readout noise)
//! D += dark_rate · n           (dark current)
//! T += e                       (total exposure)
//!
//! SNR = S · √T / √(S + B + D + R)
//! ```
//!
//! `background(v)` defaults to `v / 3`. That estimate is a placeholder rather than a sky
//! model, so it is a [`BackgroundModel`] that can be swapped for the per-frame noise level
//! without touching the aggregation.
//!
//! ## Degenerate inputs
//!
//! * No sample at all (the trajectory never crossed the cube): `SnrInfo::ZERO`.
//! * Only `NaN` samples: `signal = 0`, `frame_hits = 0` and `snr = NaN`.
//!   Scores are reported as-is; consumers rank and filter afterwards.
use std::fmt;

use crate::{
    constants::{BACKGROUND_DIVISOR, DARK_NOISE_RATE, READOUT_NOISE},
    cube_iterator::CubeSample,
    cubescan_errors::CubeScanError,
};

/// Estimate of the sky background under a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundModel {
    /// A fixed fraction of the pixel value: `v / divisor`.
    ValueFraction { divisor: f64 },
    /// The background noise level of the sample's frame.
    FrameNoise,
}

impl Default for BackgroundModel {
    fn default() -> Self {
        BackgroundModel::ValueFraction {
            divisor: BACKGROUND_DIVISOR,
        }
    }
}

impl BackgroundModel {
    #[inline]
    fn estimate(&self, value: f64, frame_noise: f64) -> f64 {
        match self {
            BackgroundModel::ValueFraction { divisor } => value / divisor,
            BackgroundModel::FrameNoise => frame_noise,
        }
    }
}

/// Detector noise parameters.
///
/// Defaults are the DECam values: dark current of
/// [`DARK_NOISE_RATE`] e⁻/px/s and readout noise of [`READOUT_NOISE`] e⁻.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseModel {
    /// Dark current (electrons per pixel per second).
    pub dark_noise_rate: f64,
    /// Readout noise (electrons).
    pub readout_noise: f64,
    pub background: BackgroundModel,
}

impl Default for NoiseModel {
    fn default() -> Self {
        NoiseModel {
            dark_noise_rate: DARK_NOISE_RATE,
            readout_noise: READOUT_NOISE,
            background: BackgroundModel::default(),
        }
    }
}

impl NoiseModel {
    /// Check that the model parameters are usable.
    pub fn validate(&self) -> Result<(), CubeScanError> {
        if !(self.dark_noise_rate.is_finite() && self.dark_noise_rate >= 0.0) {
            return Err(CubeScanError::InvalidSearchParameter(
                "dark_noise_rate must be finite and >= 0".into(),
            ));
        }
        if !(self.readout_noise.is_finite() && self.readout_noise >= 0.0) {
            return Err(CubeScanError::InvalidSearchParameter(
                "readout_noise must be finite and >= 0".into(),
            ));
        }
        if let BackgroundModel::ValueFraction { divisor } = self.background {
            if !(divisor.is_finite() && divisor > 0.0) {
                return Err(CubeScanError::InvalidSearchParameter(
                    "background divisor must be finite and > 0".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Score of one trajectory: `(snr, signal, frame_hits)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnrInfo {
    pub snr: f64,
    pub signal: f64,
    pub frame_hits: u32,
}

impl SnrInfo {
    /// Score of a trajectory without any sample.
    pub const ZERO: SnrInfo = SnrInfo {
        snr: 0.0,
        signal: 0.0,
        frame_hits: 0,
    };
}

impl fmt::Display for SnrInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SNR = {:.4}, signal = {:.4}, frames hit = {}",
            self.snr, self.signal, self.frame_hits
        )
    }
}

/// Running sums of the noise model.
#[derive(Debug, Clone, Copy, Default)]
struct NoiseTerms {
    signal: f64,
    background: f64,
    readout: f64,
    dark: f64,
    exposure: f64,
    frame_hits: u32,
}

impl NoiseTerms {
    #[inline]
    fn push(&mut self, model: &NoiseModel, sample: &CubeSample) {
        let (value, num_pixels, exposure_time) = sample.snr_info();
        if value.is_nan() {
            return;
        }
        let value = value as f64;
        let n = num_pixels as f64;

        self.signal += value;
        self.frame_hits += 1;
        self.background += model.background.estimate(value, sample.frame_noise) * n;
        self.readout += n * model.readout_noise.powi(2) / exposure_time;
        self.dark += model.dark_noise_rate * n;
        self.exposure += exposure_time;
    }

    fn snr_info(&self) -> SnrInfo {
        let noise = (self.signal + self.background + self.dark + self.readout).sqrt();
        SnrInfo {
            snr: self.signal * self.exposure.sqrt() / noise,
            signal: self.signal,
            frame_hits: self.frame_hits,
        }
    }
}

/// Score the samples of one trajectory.
///
/// Arguments
/// -----------------
/// * `samples`: the in-range samples of the trajectory, in frame order.
/// * `model`: detector noise parameters and background estimate.
///
/// Return
/// ----------
/// * [`SnrInfo::ZERO`] if `samples` is empty, the aggregated score otherwise.
///   `NaN` pixel values are skipped and do not count as frame hits.
///
/// See also
/// ------------
/// * [`TrajectoryWalk`](crate::cube_iterator::TrajectoryWalk) – Producer of the samples.
/// * [`evaluate_trajectory`](crate::search::evaluate_trajectory) – Walk and score in one call.
pub fn evaluate_samples<I>(samples: I, model: &NoiseModel) -> SnrInfo
where
    I: IntoIterator<Item = CubeSample>,
{
    let mut samples = samples.into_iter().peekable();
    if samples.peek().is_none() {
        return SnrInfo::ZERO;
    }

    let mut terms = NoiseTerms::default();
    for sample in samples {
        terms.push(model, &sample);
    }
    terms.snr_info()
}
