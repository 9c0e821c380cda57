//! # Per-frame metadata
//!
//! Every frame of a [`Cube`](crate::cube::Cube) carries a timestamp, an exposure time,
//! a point-spread width and a background noise level, plus an optional boresight sky
//! position. This module holds the owned lists ([`FrameMetadata`]) and the loaders that
//! read them from newline-delimited text files.
//!
//! ## File format
//!
//! One value per non-empty line, in frame order:
//!
//! ```text
//! 0.0
//! 1250.0
//! 2500.0
//! ```
//!
//! Sky position files hold two values per line (`ra dec`, whitespace or comma separated).
//! Lines starting with `#` are ignored.
//!
//! ## Loading contract
//!
//! A file that cannot be read, contains an unparsable or non-finite value, or whose number of
//! values differs from the number of frames is a **fatal configuration error**: the loader
//! returns a [`CubeScanError`] and no partially loaded metadata is ever produced. Exposure
//! times and PSF widths must also be strictly positive ([`FrameMetadata::validate`]).
//! A list that is not given falls back to its default:
//!
//! | list | default |
//! |---|---|
//! | timestamps | `k · 1.0` |
//! | exposure times | [`DEFAULT_EXPOSURE_TIME`] |
//! | PSF widths | [`DEFAULT_PSF`] |
//! | noise levels | [`DEFAULT_NOISE`] |
//! | sky positions | none |
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::{
    constants::{
        Seconds, Timestamp, DEFAULT_EXPOSURE_TIME, DEFAULT_FRAME_INTERVAL, DEFAULT_NOISE,
        DEFAULT_PSF,
    },
    cubescan_errors::CubeScanError,
};

/// Boresight position of a frame on the sky (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyPosition {
    pub ra: f64,
    pub dec: f64,
}

/// Optional file locations of the per-frame lists.
///
/// A `None` entry selects the default of the corresponding list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataSources {
    pub timestamp_file: Option<Utf8PathBuf>,
    pub exposure_time_file: Option<Utf8PathBuf>,
    pub psf_file: Option<Utf8PathBuf>,
    pub noise_file: Option<Utf8PathBuf>,
    pub sky_position_file: Option<Utf8PathBuf>,
}

/// Owned per-frame metadata lists.
///
/// All lists hold one entry per frame. The struct does not know the frame count of
/// the cube it will describe; [`Cube::new`](crate::cube::Cube::new) checks that every
/// list is long enough.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMetadata {
    pub(crate) timestamps: Vec<Timestamp>,
    pub(crate) exposure_times: Vec<Seconds>,
    pub(crate) psfs: Vec<f64>,
    pub(crate) noises: Vec<f64>,
    pub(crate) sky_positions: Option<Vec<SkyPosition>>,
}

impl FrameMetadata {
    /// Build metadata from explicit lists, without sky positions.
    pub fn new(
        timestamps: Vec<Timestamp>,
        exposure_times: Vec<Seconds>,
        psfs: Vec<f64>,
        noises: Vec<f64>,
    ) -> Self {
        FrameMetadata {
            timestamps,
            exposure_times,
            psfs,
            noises,
            sky_positions: None,
        }
    }

    /// Default metadata for `size_k` frames: one time unit between frames,
    /// default exposure time, PSF width and noise level.
    pub fn uniform(size_k: usize) -> Self {
        FrameMetadata::new(
            default_timestamps(size_k),
            vec![DEFAULT_EXPOSURE_TIME; size_k],
            vec![DEFAULT_PSF; size_k],
            vec![DEFAULT_NOISE; size_k],
        )
    }

    /// Attach a per-frame sky position list.
    pub fn with_sky_positions(mut self, sky_positions: Vec<SkyPosition>) -> Self {
        self.sky_positions = Some(sky_positions);
        self
    }

    /// Replace the timestamp list.
    pub fn with_timestamps(mut self, timestamps: Vec<Timestamp>) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Replace the exposure time list.
    pub fn with_exposure_times(mut self, exposure_times: Vec<Seconds>) -> Self {
        self.exposure_times = exposure_times;
        self
    }

    /// Replace the noise level list.
    pub fn with_noises(mut self, noises: Vec<f64>) -> Self {
        self.noises = noises;
        self
    }

    /// Load the metadata of `size_k` frames from the given sources.
    ///
    /// Arguments
    /// -----------------
    /// * `size_k`: number of frames of the cube.
    /// * `sources`: optional file location of each list.
    ///
    /// Return
    /// ----------
    /// * The loaded metadata, or the first configuration error met.
    ///
    /// See also
    /// ------------
    /// * [`read_frame_values`] – Reader used for the scalar lists.
    /// * [`read_sky_positions`] – Reader used for the sky position list.
    pub fn load(size_k: usize, sources: &MetadataSources) -> Result<Self, CubeScanError> {
        let timestamps = match &sources.timestamp_file {
            Some(path) => read_frame_values(path, size_k)?,
            None => default_timestamps(size_k),
        };
        let exposure_times =
            read_or_default(&sources.exposure_time_file, size_k, DEFAULT_EXPOSURE_TIME)?;
        let psfs = read_or_default(&sources.psf_file, size_k, DEFAULT_PSF)?;
        let noises = read_or_default(&sources.noise_file, size_k, DEFAULT_NOISE)?;
        let sky_positions = sources
            .sky_position_file
            .as_deref()
            .map(|path| read_sky_positions(path, size_k))
            .transpose()?;

        let metadata = FrameMetadata {
            timestamps,
            exposure_times,
            psfs,
            noises,
            sky_positions,
        };
        metadata.validate(size_k)?;
        Ok(metadata)
    }

    /// Number of frames every list covers (the shortest list length).
    pub fn len(&self) -> usize {
        [
            self.timestamps.len(),
            self.exposure_times.len(),
            self.psfs.len(),
            self.noises.len(),
        ]
        .into_iter()
        .chain(self.sky_positions.as_ref().map(Vec::len))
        .min()
        .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the first `size_k` entries of every list.
    ///
    /// Return
    /// ----------
    /// * [`CubeScanError::MetadataTooShort`] if a list covers fewer than `size_k` frames.
    /// * [`CubeScanError::InvalidMetadataValue`] if a timestamp, noise level or sky position
    ///   is not finite, or an exposure time or PSF width is not finite and strictly positive.
    pub fn validate(&self, size_k: usize) -> Result<(), CubeScanError> {
        let lists: [(&'static str, usize); 4] = [
            ("timestamps", self.timestamps.len()),
            ("exposure times", self.exposure_times.len()),
            ("psf widths", self.psfs.len()),
            ("noise levels", self.noises.len()),
        ];
        let sky = self
            .sky_positions
            .as_ref()
            .map(|v| ("sky positions", v.len()));

        for (name, found) in lists.into_iter().chain(sky) {
            if found < size_k {
                return Err(CubeScanError::MetadataTooShort {
                    name,
                    expected: size_k,
                    found,
                });
            }
        }

        check_values("timestamp", &self.timestamps[..size_k], Requirement::Finite)?;
        check_values(
            "exposure time",
            &self.exposure_times[..size_k],
            Requirement::Positive,
        )?;
        check_values("psf width", &self.psfs[..size_k], Requirement::Positive)?;
        check_values("noise level", &self.noises[..size_k], Requirement::Finite)?;
        if let Some(positions) = &self.sky_positions {
            for (frame, pos) in positions[..size_k].iter().enumerate() {
                for (name, value) in [("right ascension", pos.ra), ("declination", pos.dec)] {
                    Requirement::Finite.check(name, frame, value)?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Requirement {
    Finite,
    Positive,
}

impl Requirement {
    fn check(self, name: &'static str, frame: usize, value: f64) -> Result<(), CubeScanError> {
        let (ok, requirement) = match self {
            Requirement::Finite => (value.is_finite(), "finite"),
            Requirement::Positive => (value.is_finite() && value > 0.0, "finite and > 0"),
        };
        if ok {
            Ok(())
        } else {
            Err(CubeScanError::InvalidMetadataValue {
                name,
                frame,
                value,
                requirement,
            })
        }
    }
}

fn check_values(
    name: &'static str,
    values: &[f64],
    requirement: Requirement,
) -> Result<(), CubeScanError> {
    values
        .iter()
        .enumerate()
        .try_for_each(|(frame, &value)| requirement.check(name, frame, value))
}

fn default_timestamps(size_k: usize) -> Vec<Timestamp> {
    (0..size_k)
        .map(|k| k as f64 * DEFAULT_FRAME_INTERVAL)
        .collect()
}

fn read_or_default(
    path: &Option<Utf8PathBuf>,
    size_k: usize,
    default: f64,
) -> Result<Vec<f64>, CubeScanError> {
    match path {
        Some(path) => read_frame_values(path, size_k),
        None => Ok(vec![default; size_k]),
    }
}

/// Read the content of a metadata file, keeping the 1-based line number of each
/// meaningful line.
fn meaningful_lines(path: &Utf8Path) -> Result<Vec<(usize, String)>, CubeScanError> {
    let content = fs::read_to_string(path).map_err(|source| CubeScanError::UnreadableFile {
        path: path.to_string(),
        source,
    })?;

    Ok(content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(i, line)| (i, line.to_string()))
        .collect())
}

/// Parse one finite real value; `NaN` and infinities are rejected like unparsable text.
fn parse_value(path: &Utf8Path, line: usize, token: &str) -> Result<f64, CubeScanError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CubeScanError::InvalidMetadataLine {
            path: path.to_string(),
            line,
            content: token.to_string(),
        })
}

fn check_count(path: &Utf8Path, expected: usize, found: usize) -> Result<(), CubeScanError> {
    if expected != found {
        return Err(CubeScanError::FrameCountMismatch {
            path: path.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

/// Read one real value per frame from a newline-delimited file.
///
/// Arguments
/// -----------------
/// * `path`: the file to read.
/// * `size_k`: the number of frames; the file must hold exactly this many values.
///
/// Return
/// ----------
/// * The values in file order.
/// * [`CubeScanError::UnreadableFile`] if the file cannot be read,
///   [`CubeScanError::InvalidMetadataLine`] on an unparsable or non-finite value,
///   [`CubeScanError::FrameCountMismatch`] if the value count differs from `size_k`.
pub fn read_frame_values(path: &Utf8Path, size_k: usize) -> Result<Vec<f64>, CubeScanError> {
    let values = meaningful_lines(path)?
        .into_iter()
        .map(|(line, content)| parse_value(path, line, &content))
        .collect::<Result<Vec<f64>, _>>()?;

    check_count(path, size_k, values.len())?;
    debug!(%path, frames = values.len(), "loaded per-frame values");
    Ok(values)
}

/// Read one `ra dec` pair per frame from a newline-delimited file.
///
/// Same contract as [`read_frame_values`]; each line must hold exactly two values.
pub fn read_sky_positions(
    path: &Utf8Path,
    size_k: usize,
) -> Result<Vec<SkyPosition>, CubeScanError> {
    let positions = meaningful_lines(path)?
        .into_iter()
        .map(|(line, content)| {
            let tokens: Vec<&str> = content
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .collect();
            match tokens.as_slice() {
                [ra, dec] => Ok(SkyPosition {
                    ra: parse_value(path, line, ra)?,
                    dec: parse_value(path, line, dec)?,
                }),
                _ => Err(CubeScanError::InvalidMetadataLine {
                    path: path.to_string(),
                    line,
                    content: content.clone(),
                }),
            }
        })
        .collect::<Result<Vec<SkyPosition>, _>>()?;

    check_count(path, size_k, positions.len())?;
    debug!(%path, frames = positions.len(), "loaded sky positions");
    Ok(positions)
}

#[cfg(test)]
mod frame_metadata_test {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_tmp(content: &str) -> (NamedTempFile, Utf8PathBuf) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf()).unwrap();
        (file, path)
    }

    #[test]
    fn test_uniform_defaults() {
        let meta = FrameMetadata::uniform(4);
        assert_eq!(meta.timestamps, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(meta.exposure_times, vec![40.0; 4]);
        assert_eq!(meta.psfs, vec![1.0; 4]);
        assert_eq!(meta.noises, vec![0.0; 4]);
        assert!(meta.sky_positions.is_none());
        assert_eq!(meta.len(), 4);
    }

    #[test]
    fn test_read_frame_values() {
        let (_f, path) = write_tmp("0.0\n1250.5\n\n# comment\n2500\n");
        let values = read_frame_values(&path, 3).unwrap();
        assert_eq!(values, vec![0.0, 1250.5, 2500.0]);
    }

    #[test]
    fn test_read_frame_values_count_mismatch() {
        let (_f, path) = write_tmp("1.0\n2.0\n");
        let err = read_frame_values(&path, 3).unwrap_err();
        assert_eq!(
            err,
            CubeScanError::FrameCountMismatch {
                path: path.to_string(),
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn test_read_frame_values_bad_line() {
        let (_f, path) = write_tmp("1.0\nabc\n");
        let err = read_frame_values(&path, 2).unwrap_err();
        assert_eq!(
            err,
            CubeScanError::InvalidMetadataLine {
                path: path.to_string(),
                line: 2,
                content: "abc".into(),
            }
        );
    }

    #[test]
    fn test_unreadable_file() {
        let path = Utf8Path::new("/nonexistent/cubescan/timestamps.txt");
        let err = read_frame_values(path, 1).unwrap_err();
        assert!(matches!(err, CubeScanError::UnreadableFile { .. }));
    }

    #[test]
    fn test_read_sky_positions() {
        let (_f, path) = write_tmp("10.5 -3.25\n10.6,-3.3\n");
        let pos = read_sky_positions(&path, 2).unwrap();
        assert_eq!(
            pos,
            vec![
                SkyPosition {
                    ra: 10.5,
                    dec: -3.25
                },
                SkyPosition { ra: 10.6, dec: -3.3 }
            ]
        );

        let (_g, bad) = write_tmp("10.5\n");
        assert!(matches!(
            read_sky_positions(&bad, 1),
            Err(CubeScanError::InvalidMetadataLine { line: 1, .. })
        ));
    }

    #[test]
    fn test_load_mixed_sources() {
        let (_f, ts) = write_tmp("0\n100\n300\n");
        let sources = MetadataSources {
            timestamp_file: Some(ts),
            ..Default::default()
        };
        let meta = FrameMetadata::load(3, &sources).unwrap();
        assert_eq!(meta.timestamps, vec![0.0, 100.0, 300.0]);
        assert_eq!(meta.exposure_times, vec![DEFAULT_EXPOSURE_TIME; 3]);
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        for token in ["NaN", "inf", "-inf"] {
            let (_f, path) = write_tmp(&format!("0.0\n{token}\n2.0\n"));
            assert_eq!(
                read_frame_values(&path, 3),
                Err(CubeScanError::InvalidMetadataLine {
                    path: path.to_string(),
                    line: 2,
                    content: token.into(),
                })
            );
        }

        let (_f, path) = write_tmp("10.0 NaN\n");
        assert!(matches!(
            read_sky_positions(&path, 1),
            Err(CubeScanError::InvalidMetadataLine { line: 1, .. })
        ));
    }

    #[test]
    fn test_load_rejects_non_positive_exposure() {
        let (_f, exp) = write_tmp("40\n-40\n");
        let sources = MetadataSources {
            exposure_time_file: Some(exp),
            ..Default::default()
        };
        assert_eq!(
            FrameMetadata::load(2, &sources),
            Err(CubeScanError::InvalidMetadataValue {
                name: "exposure time",
                frame: 1,
                value: -40.0,
                requirement: "finite and > 0",
            })
        );

        let (_g, zero) = write_tmp("40\n0\n");
        let sources = MetadataSources {
            exposure_time_file: Some(zero),
            ..Default::default()
        };
        assert!(matches!(
            FrameMetadata::load(2, &sources),
            Err(CubeScanError::InvalidMetadataValue { frame: 1, .. })
        ));
    }

    #[test]
    fn test_load_rejects_non_positive_psf() {
        let (_f, psf) = write_tmp("1.0\n0.0\n1.2\n");
        let sources = MetadataSources {
            psf_file: Some(psf),
            ..Default::default()
        };
        assert!(matches!(
            FrameMetadata::load(3, &sources),
            Err(CubeScanError::InvalidMetadataValue {
                name: "psf width",
                frame: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_negative_noise_and_timestamps_are_accepted() {
        let (_f, ts) = write_tmp("-5\n0\n5\n");
        let (_g, noise) = write_tmp("-1.5\n0\n2\n");
        let sources = MetadataSources {
            timestamp_file: Some(ts),
            noise_file: Some(noise),
            ..Default::default()
        };
        let meta = FrameMetadata::load(3, &sources).unwrap();
        assert_eq!(meta.timestamps, vec![-5.0, 0.0, 5.0]);
        assert_eq!(meta.noises, vec![-1.5, 0.0, 2.0]);
    }

    #[test]
    fn test_validate_in_memory_lists() {
        let meta = FrameMetadata::uniform(3).with_noises(vec![0.0, f64::INFINITY, 0.0]);
        assert!(matches!(
            meta.validate(3),
            Err(CubeScanError::InvalidMetadataValue {
                name: "noise level",
                frame: 1,
                ..
            })
        ));
        // entries past the frame count are not looked at
        let longer = FrameMetadata::uniform(2).with_exposure_times(vec![40.0, 40.0, -1.0]);
        assert!(longer.validate(2).is_ok());

        let sky = FrameMetadata::uniform(1).with_sky_positions(vec![SkyPosition {
            ra: f64::NAN,
            dec: 0.0,
        }]);
        assert!(matches!(
            sky.validate(1),
            Err(CubeScanError::InvalidMetadataValue {
                name: "right ascension",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_coverage() {
        let meta = FrameMetadata::uniform(2);
        assert!(meta.validate(2).is_ok());
        assert_eq!(
            meta.validate(3),
            Err(CubeScanError::MetadataTooShort {
                name: "timestamps",
                expected: 3,
                found: 2,
            })
        );
    }
}
