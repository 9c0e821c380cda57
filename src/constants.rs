//! # Constants and type definitions for cubescan
//!
//! This module centralizes the **instrument constants**, **run defaults**, and **common type
//! aliases** used throughout the `cubescan` library.
//!
//! ## Overview
//!
//! - Detector noise constants (dark current, readout noise)
//! - Defaults for missing per-frame metadata (exposure time, PSF width, noise level)
//! - Defaults of the Monte-Carlo search (trajectory count, base seed, slope distribution)
//! - Core type aliases used across the crate
//!
//! The detector constants are the DECam values; they are the defaults of
//! [`NoiseModel`](crate::snr::NoiseModel) and can be overridden there.

// -------------------------------------------------------------------------------------------------
// Detector constants
// -------------------------------------------------------------------------------------------------

/// Dark current in electrons per pixel per second
pub const DARK_NOISE_RATE: f64 = 0.417;

/// Readout noise in electrons
pub const READOUT_NOISE: f64 = 7.0;

/// Divisor of the pixel value used as a background estimate (`v / 3`)
pub const BACKGROUND_DIVISOR: f64 = 3.0;

// -------------------------------------------------------------------------------------------------
// Metadata defaults
// -------------------------------------------------------------------------------------------------

/// Exposure time used when no exposure-time list is given (seconds)
pub const DEFAULT_EXPOSURE_TIME: Seconds = 40.0;

/// Point-spread width used when no PSF list is given
pub const DEFAULT_PSF: f64 = 1.0;

/// Background noise level used when no noise list is given
pub const DEFAULT_NOISE: f64 = 0.0;

/// Time step between two frames when no timestamp list is given
pub const DEFAULT_FRAME_INTERVAL: f64 = 1.0;

// -------------------------------------------------------------------------------------------------
// Search defaults
// -------------------------------------------------------------------------------------------------

/// Number of random trajectories sampled by default
pub const DEFAULT_NUM_TRAJECTORIES: usize = 100_000;

/// Base seed of the per-worker random generators (worker `w` uses `DEFAULT_SEED + w`)
pub const DEFAULT_SEED: u64 = 123;

/// Shape parameters of the default Beta slope distribution
pub const DEFAULT_BETA_ALPHA: f64 = 3.0;
pub const DEFAULT_BETA_BETA: f64 = 2.0;

/// Slope range the Beta distribution is mapped onto (pixels per time unit)
pub const DEFAULT_SLOPE_MIN: f64 = -1.0;
pub const DEFAULT_SLOPE_MAX: f64 = 1.0;

/// Name of the CSV file written by the command line tool
pub const DEFAULT_OUTPUT_FILE: &str = "vector_output.csv";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Element type of the mapped pixel volume
pub type Pixel = f32;

/// Index of a frame along the time axis
pub type FrameIndex = usize;

/// Duration in seconds
pub type Seconds = f64;

/// Frame timestamp, in the unit of the timestamp list (hundredths of a second for DECam data)
pub type Timestamp = f64;
