//! # Run configuration
//!
//! Environment-style configuration of a search. Every key is optional:
//!
//! | key | meaning | default |
//! |---|---|---|
//! | `NUM_VECTORS` | number of random trajectories | 100 000 |
//! | `TIMESTAMP_FILE` | per-frame timestamps | `k · 1.0` |
//! | `EXPOSURETIME_FILE` | per-frame exposure times | 40.0 |
//! | `PSF_FILE` | per-frame PSF widths | 1.0 |
//! | `NOISE_FILE` | per-frame background noise levels | 0.0 |
//! | `RA_DEC_FILE` | per-frame boresight `ra dec` | none |
//! | `SLOPE_PDF_FILE` | weighted slope samples | Beta(3, 2) |
//!
//! An empty value is treated as unset. A `NUM_VECTORS` value that is not a positive integer is
//! a configuration error. The files themselves are only read by
//! [`FrameMetadata::load`](crate::cube::FrameMetadata::load) and
//! [`SlopeSampler::from_file_or_default`].
//!
//! [`SlopeSampler::from_file_or_default`]: crate::slope_distribution::SlopeSampler
use camino::Utf8PathBuf;

use crate::{
    constants::DEFAULT_NUM_TRAJECTORIES, cube::MetadataSources, cubescan_errors::CubeScanError,
};

pub const NUM_VECTORS: &str = "NUM_VECTORS";
pub const TIMESTAMP_FILE: &str = "TIMESTAMP_FILE";
pub const EXPOSURETIME_FILE: &str = "EXPOSURETIME_FILE";
pub const PSF_FILE: &str = "PSF_FILE";
pub const NOISE_FILE: &str = "NOISE_FILE";
pub const RA_DEC_FILE: &str = "RA_DEC_FILE";
pub const SLOPE_PDF_FILE: &str = "SLOPE_PDF_FILE";

/// Configuration of a search read from environment-style key/value pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub num_trajectories: usize,
    pub metadata: MetadataSources,
    pub slope_pdf_file: Option<Utf8PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            num_trajectories: DEFAULT_NUM_TRAJECTORIES,
            metadata: MetadataSources::default(),
            slope_pdf_file: None,
        }
    }
}

impl ScanConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, CubeScanError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration from an arbitrary key lookup.
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use cubescan::config::ScanConfig;
    ///
    /// let vars = HashMap::from([("NUM_VECTORS", "5000"), ("PSF_FILE", "psf.txt")]);
    /// let config = ScanConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
    ///
    /// assert_eq!(config.num_trajectories, 5000);
    /// assert_eq!(config.metadata.psf_file.as_deref().map(|p| p.as_str()), Some("psf.txt"));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CubeScanError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let path = |key: &str| get(key).map(|v| Utf8PathBuf::from(v.trim()));

        let num_trajectories = match get(NUM_VECTORS) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(CubeScanError::InvalidConfigValue {
                        key: NUM_VECTORS.into(),
                        value: raw,
                    })
                }
            },
            None => DEFAULT_NUM_TRAJECTORIES,
        };

        Ok(ScanConfig {
            num_trajectories,
            metadata: MetadataSources {
                timestamp_file: path(TIMESTAMP_FILE),
                exposure_time_file: path(EXPOSURETIME_FILE),
                psf_file: path(PSF_FILE),
                noise_file: path(NOISE_FILE),
                sky_position_file: path(RA_DEC_FILE),
            },
            slope_pdf_file: path(SLOPE_PDF_FILE),
        })
    }
}
