//! # Image cube
//!
//! A [`Cube`] is an immutable view over a 3-D pixel volume `(x, y, k)` where `k` is the
//! time-ordered frame index, together with the per-frame metadata needed to score
//! trajectories ([`FrameMetadata`]).
//!
//! ## Ownership
//!
//! The pixel volume is **borrowed**: it usually lives in a memory mapping owned by
//! a [`MappedCube`](crate::cube::mapped_file::MappedCube) (or any other slice owner), and the
//! lifetime `'a` ties the cube to it. The metadata lists are **owned** by the cube.
//!
//! ```text
//! MappedCube (owns the mapping)
//!     └── &'a [Pixel] ──► Cube<'a> ◄── FrameMetadata (owned)
//! ```
//!
//! ## Layout
//!
//! Pixels are stored frame after frame, each frame row-major:
//!
//! ```text
//! index(x, y, k) = k · size_x · size_y + y · size_x + x
//! ```
//!
//! ## Contracts
//!
//! * [`Cube::out_of_range`] must be checked before [`Cube::get_pixel_value`]; trajectories
//!   routinely leave the frame and coordinates are therefore signed.
//! * Pixel values may be `NaN` (masked or invalid pixels); callers treat them as "no signal".
//! * Metadata accessors panic on an out-of-range frame index: this is a programming error,
//!   not a runtime condition.
//!
//! ## Example
//!
//! ```rust
//! use cubescan::cube::{Cube, FrameMetadata};
//!
//! let pixels = vec![1.0_f32; 4 * 3 * 2];
//! let cube = Cube::new(4, 3, 2, &pixels, FrameMetadata::uniform(2)).unwrap();
//!
//! assert_eq!(cube.size(), (4, 3, 2));
//! assert!(!cube.out_of_range(3, 2, 1));
//! assert!(cube.out_of_range(4, 0, 0));
//! assert_eq!(cube.get_pixel_value(1, 1, 1), 1.0);
//! ```
pub mod frame_metadata;
pub mod mapped_file;

pub use frame_metadata::{FrameMetadata, MetadataSources, SkyPosition};

use crate::{
    constants::{FrameIndex, Pixel, Seconds, Timestamp},
    cubescan_errors::CubeScanError,
};

/// Number of pixels of a `size_x · size_y · size_k` volume, or
/// [`CubeScanError::CubeExtentsOverflow`] if it does not fit in a `usize`.
pub(crate) fn volume_len(
    size_x: usize,
    size_y: usize,
    size_k: usize,
) -> Result<usize, CubeScanError> {
    size_x
        .checked_mul(size_y)
        .and_then(|n| n.checked_mul(size_k))
        .ok_or(CubeScanError::CubeExtentsOverflow(size_x, size_y, size_k))
}

/// Read-only view over a pixel volume and its per-frame metadata.
#[derive(Debug, Clone)]
pub struct Cube<'a> {
    size_x: usize,
    size_y: usize,
    size_k: usize,
    pixels: &'a [Pixel],
    metadata: FrameMetadata,
}

impl<'a> Cube<'a> {
    /// Build a cube over a borrowed pixel volume.
    ///
    /// Arguments
    /// -----------------
    /// * `size_x`, `size_y`: spatial extents of a frame.
    /// * `size_k`: number of frames.
    /// * `pixels`: the volume, exactly `size_x · size_y · size_k` elements.
    /// * `metadata`: per-frame lists, each covering at least `size_k` frames.
    ///
    /// Return
    /// ----------
    /// * The cube, or
    ///   [`CubeScanError::EmptyCube`] if an extent is zero,
    ///   [`CubeScanError::CubeExtentsOverflow`] if the volume size overflows,
    ///   [`CubeScanError::PixelBufferSizeMismatch`] if the buffer length is wrong,
    ///   [`CubeScanError::MetadataTooShort`] if a metadata list is shorter than `size_k`,
    ///   [`CubeScanError::InvalidMetadataValue`] on a non-finite or non-positive entry
    ///   (see [`FrameMetadata::validate`]).
    pub fn new(
        size_x: usize,
        size_y: usize,
        size_k: usize,
        pixels: &'a [Pixel],
        metadata: FrameMetadata,
    ) -> Result<Self, CubeScanError> {
        if size_x == 0 || size_y == 0 || size_k == 0 {
            return Err(CubeScanError::EmptyCube(size_x, size_y, size_k));
        }
        let expected = volume_len(size_x, size_y, size_k)?;
        if pixels.len() != expected {
            return Err(CubeScanError::PixelBufferSizeMismatch {
                expected,
                found: pixels.len(),
            });
        }
        metadata.validate(size_k)?;

        Ok(Cube {
            size_x,
            size_y,
            size_k,
            pixels,
            metadata,
        })
    }

    /// Extents of the cube as `(size_x, size_y, size_k)`.
    #[inline]
    pub fn size(&self) -> (usize, usize, usize) {
        (self.size_x, self.size_y, self.size_k)
    }

    /// `true` if `(x, y, k)` lies outside the addressable volume.
    #[inline]
    pub fn out_of_range(&self, x: i64, y: i64, k: i64) -> bool {
        x < 0
            || y < 0
            || k < 0
            || x as u64 >= self.size_x as u64
            || y as u64 >= self.size_y as u64
            || k as u64 >= self.size_k as u64
    }

    #[inline]
    fn index(&self, x: usize, y: usize, k: usize) -> usize {
        (k * self.size_y + y) * self.size_x + x
    }

    /// Pixel value at `(x, y, k)`. The value may be `NaN`.
    ///
    /// # Panics
    ///
    /// If [`Cube::out_of_range`] is `true` for the coordinate.
    #[inline]
    pub fn get_pixel_value(&self, x: i64, y: i64, k: i64) -> Pixel {
        assert!(
            !self.out_of_range(x, y, k),
            "pixel ({x}, {y}, {k}) is outside a cube of size {:?}",
            self.size()
        );
        self.pixels[self.index(x as usize, y as usize, k as usize)]
    }

    #[inline]
    fn check_frame(&self, k: FrameIndex) {
        assert!(
            k < self.size_k,
            "frame index {k} out of range (size_k = {})",
            self.size_k
        );
    }

    /// Timestamp of frame `k`.
    #[inline]
    pub fn timestamp(&self, k: FrameIndex) -> Timestamp {
        self.check_frame(k);
        self.metadata.timestamps[k]
    }

    /// Time elapsed between frame 0 and frame `k`.
    #[inline]
    pub fn time_offset(&self, k: FrameIndex) -> f64 {
        self.timestamp(k) - self.timestamp(0)
    }

    /// Exposure time of frame `k`.
    #[inline]
    pub fn exposuretime(&self, k: FrameIndex) -> Seconds {
        self.check_frame(k);
        self.metadata.exposure_times[k]
    }

    /// Point-spread width of frame `k`.
    #[inline]
    pub fn psf(&self, k: FrameIndex) -> f64 {
        self.check_frame(k);
        self.metadata.psfs[k]
    }

    /// Background noise level of frame `k`.
    #[inline]
    pub fn noise(&self, k: FrameIndex) -> f64 {
        self.check_frame(k);
        self.metadata.noises[k]
    }

    /// Boresight sky position of frame `k`, if the cube carries sky positions.
    pub fn sky_position(&self, k: FrameIndex) -> Option<SkyPosition> {
        self.check_frame(k);
        self.metadata.sky_positions.as_ref().map(|pos| pos[k])
    }
}

#[cfg(test)]
mod cube_test {
    use super::*;

    fn ramp(size_x: usize, size_y: usize, size_k: usize) -> Vec<Pixel> {
        (0..size_x * size_y * size_k).map(|i| i as Pixel).collect()
    }

    #[test]
    fn test_size_and_layout() {
        let pixels = ramp(4, 3, 2);
        let cube = Cube::new(4, 3, 2, &pixels, FrameMetadata::uniform(2)).unwrap();

        assert_eq!(cube.size(), (4, 3, 2));
        assert_eq!(cube.get_pixel_value(0, 0, 0), 0.0);
        assert_eq!(cube.get_pixel_value(1, 0, 0), 1.0);
        assert_eq!(cube.get_pixel_value(0, 1, 0), 4.0);
        assert_eq!(cube.get_pixel_value(0, 0, 1), 12.0);
        assert_eq!(cube.get_pixel_value(3, 2, 1), 23.0);
    }

    #[test]
    fn test_out_of_range_every_axis() {
        let pixels = ramp(4, 3, 2);
        let cube = Cube::new(4, 3, 2, &pixels, FrameMetadata::uniform(2)).unwrap();

        for k in 0..2 {
            for y in 0..3 {
                for x in 0..4 {
                    assert!(!cube.out_of_range(x, y, k));
                    assert!(!cube.get_pixel_value(x, y, k).is_nan());
                }
            }
        }

        for (x, y, k) in [
            (-1, 0, 0),
            (0, -1, 0),
            (0, 0, -1),
            (4, 0, 0),
            (0, 3, 0),
            (0, 0, 2),
            (i64::MAX, 0, 0),
            (i64::MIN, i64::MIN, i64::MIN),
        ] {
            assert!(cube.out_of_range(x, y, k), "({x}, {y}, {k})");
        }
    }

    #[test]
    #[should_panic(expected = "outside a cube")]
    fn test_pixel_access_out_of_range_panics() {
        let pixels = ramp(2, 2, 1);
        let cube = Cube::new(2, 2, 1, &pixels, FrameMetadata::uniform(1)).unwrap();
        cube.get_pixel_value(2, 0, 0);
    }

    #[test]
    #[should_panic(expected = "frame index 3 out of range")]
    fn test_metadata_access_out_of_range_panics() {
        let pixels = ramp(2, 2, 3);
        let cube = Cube::new(2, 2, 3, &pixels, FrameMetadata::uniform(5)).unwrap();
        // the lists are longer than size_k, the frame index is still checked against size_k
        cube.exposuretime(3);
    }

    #[test]
    fn test_construction_errors() {
        let pixels = ramp(2, 2, 2);
        assert_eq!(
            Cube::new(2, 2, 2, &pixels[..7], FrameMetadata::uniform(2)).unwrap_err(),
            CubeScanError::PixelBufferSizeMismatch {
                expected: 8,
                found: 7
            }
        );
        assert_eq!(
            Cube::new(2, 0, 2, &pixels, FrameMetadata::uniform(2)).unwrap_err(),
            CubeScanError::EmptyCube(2, 0, 2)
        );
        assert!(matches!(
            Cube::new(2, 2, 2, &pixels, FrameMetadata::uniform(1)),
            Err(CubeScanError::MetadataTooShort { .. })
        ));
    }

    #[test]
    fn test_extents_overflow() {
        let pixels = ramp(2, 2, 1);
        let huge = usize::MAX / 2 + 1;
        assert_eq!(
            Cube::new(huge, 2, 1, &pixels, FrameMetadata::uniform(1)).unwrap_err(),
            CubeScanError::CubeExtentsOverflow(huge, 2, 1)
        );
        assert_eq!(
            Cube::new(2, 2, usize::MAX, &pixels, FrameMetadata::uniform(1)).unwrap_err(),
            CubeScanError::CubeExtentsOverflow(2, 2, usize::MAX)
        );
    }

    #[test]
    fn test_invalid_metadata_values() {
        let pixels = vec![7.0; 4 * 4 * 3];
        let nan_time = FrameMetadata::uniform(3).with_timestamps(vec![0.0, f64::NAN, 2.0]);
        assert_eq!(
            Cube::new(4, 4, 3, &pixels, nan_time).unwrap_err(),
            CubeScanError::InvalidMetadataValue {
                name: "timestamp",
                frame: 1,
                value: f64::NAN,
                requirement: "finite",
            }
        );

        let negative_exposure =
            FrameMetadata::uniform(3).with_exposure_times(vec![40.0, -40.0, 40.0]);
        assert!(matches!(
            Cube::new(4, 4, 3, &pixels, negative_exposure),
            Err(CubeScanError::InvalidMetadataValue {
                name: "exposure time",
                frame: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_metadata_accessors() {
        let pixels = ramp(1, 1, 3);
        let meta = FrameMetadata::new(
            vec![10.0, 15.0, 30.0],
            vec![40.0, 30.0, 20.0],
            vec![1.0, 1.5, 2.0],
            vec![5.0, 6.0, 7.0],
        )
        .with_sky_positions(vec![
            SkyPosition { ra: 1.0, dec: 2.0 },
            SkyPosition { ra: 1.1, dec: 2.1 },
            SkyPosition { ra: 1.2, dec: 2.2 },
        ]);
        let cube = Cube::new(1, 1, 3, &pixels, meta).unwrap();

        assert_eq!(cube.timestamp(2), 30.0);
        assert_eq!(cube.time_offset(1), 5.0);
        assert_eq!(cube.exposuretime(1), 30.0);
        assert_eq!(cube.psf(2), 2.0);
        assert_eq!(cube.noise(0), 5.0);
        assert_eq!(cube.sky_position(1), Some(SkyPosition { ra: 1.1, dec: 2.1 }));
    }
}
