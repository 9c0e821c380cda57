//! # Walking a cube along a trajectory
//!
//! [`TrajectoryWalk`] visits the frames of a [`Cube`] in order and, for each frame `k`,
//! projects a [`LinearTrajectory`] at the frame's time offset
//! `timestamp(k) − timestamp(0)`. Frames where the projected pixel falls outside the cube
//! are skipped silently; the others yield a [`CubeSample`] carrying the pixel value and the
//! per-frame context used by the noise model.
//!
//! ```text
//! frame:     0      1      2      3      4
//! position: (3,3)  (4,3)  (5,3)  (6,3)  (7,3)      size_x = 6
//! sample:    ✓      ✓      ✓      ✗ OOR  ✗ OOR
//! ```
//!
//! The walk is lazy, finite (at most `size_k` samples) and forward-only; a new walk is built
//! to start over. [`FrameVisits`] exposes the same traversal without skipping, one
//! [`FrameVisit`] per frame, which is what trajectory traces are made of.
//!
//! ```rust
//! use cubescan::cube::{Cube, FrameMetadata};
//! use cubescan::cube_iterator::TrajectoryWalk;
//! use cubescan::trajectory::LinearTrajectory;
//!
//! let pixels = vec![100.0_f32; 10 * 10 * 5];
//! let cube = Cube::new(10, 10, 5, &pixels, FrameMetadata::uniform(5)).unwrap();
//! let traj = LinearTrajectory::new(0.0, 4.0, 0.0, 4.0);
//!
//! let total: f64 = TrajectoryWalk::new(&cube, traj).map(|s| s.value as f64).sum();
//! assert_eq!(total, 500.0);
//! ```
use std::iter::FusedIterator;

use crate::{
    constants::{FrameIndex, Pixel, Seconds},
    cube::Cube,
    trajectory::LinearTrajectory,
};

/// Outcome of projecting a trajectory on one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameVisit {
    pub k: FrameIndex,
    pub x: i64,
    pub y: i64,
    /// Pixel value, `None` when `(x, y, k)` is out of range.
    pub value: Option<Pixel>,
}

impl FrameVisit {
    pub fn in_range(&self) -> bool {
        self.value.is_some()
    }
}

/// One in-range sample of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeSample {
    pub k: FrameIndex,
    pub x: i64,
    pub y: i64,
    /// Pixel value, possibly `NaN`.
    pub value: Pixel,
    /// Number of pixels contributing to the sample (1 for a single-pixel aperture).
    pub num_pixels: u32,
    /// Exposure time of frame `k`.
    pub exposure_time: Seconds,
    /// Background noise level of frame `k`.
    pub frame_noise: f64,
}

impl CubeSample {
    /// `(value, num_pixels, exposure_time)`, the inputs of the noise model.
    #[inline]
    pub fn snr_info(&self) -> (Pixel, u32, Seconds) {
        (self.value, self.num_pixels, self.exposure_time)
    }
}

/// Every frame of a cube projected through a trajectory, in frame order.
#[derive(Debug, Clone)]
pub struct FrameVisits<'c, 'a> {
    cube: &'c Cube<'a>,
    trajectory: LinearTrajectory,
    start_offset: f64,
    next_k: FrameIndex,
    end_k: FrameIndex,
}

impl<'c, 'a> FrameVisits<'c, 'a> {
    /// Visit all frames, with time offsets counted from frame 0 plus `start_offset`.
    pub fn new(cube: &'c Cube<'a>, trajectory: LinearTrajectory, start_offset: f64) -> Self {
        FrameVisits {
            cube,
            trajectory,
            start_offset,
            next_k: 0,
            end_k: cube.size().2,
        }
    }

    fn visit(&self, k: FrameIndex) -> FrameVisit {
        let t = self.cube.time_offset(k) + self.start_offset;
        let (x, y) = self.trajectory.position(t);
        let value = if self.cube.out_of_range(x, y, k as i64) {
            None
        } else {
            Some(self.cube.get_pixel_value(x, y, k as i64))
        };
        FrameVisit { k, x, y, value }
    }
}

impl Iterator for FrameVisits<'_, '_> {
    type Item = FrameVisit;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_k >= self.end_k {
            return None;
        }
        let visit = self.visit(self.next_k);
        self.next_k += 1;
        Some(visit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end_k - self.next_k;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameVisits<'_, '_> {}
impl FusedIterator for FrameVisits<'_, '_> {}

/// In-range samples of a trajectory through a cube.
#[derive(Debug, Clone)]
pub struct TrajectoryWalk<'c, 'a> {
    visits: FrameVisits<'c, 'a>,
}

impl<'c, 'a> TrajectoryWalk<'c, 'a> {
    /// Walk `trajectory` from frame 0.
    pub fn new(cube: &'c Cube<'a>, trajectory: LinearTrajectory) -> Self {
        Self::with_start_offset(cube, trajectory, 0.0)
    }

    /// Walk `trajectory` with every frame's time offset shifted by `start_offset`.
    pub fn with_start_offset(
        cube: &'c Cube<'a>,
        trajectory: LinearTrajectory,
        start_offset: f64,
    ) -> Self {
        TrajectoryWalk {
            visits: FrameVisits::new(cube, trajectory, start_offset),
        }
    }

    /// The trajectory being walked.
    pub fn trajectory(&self) -> &LinearTrajectory {
        &self.visits.trajectory
    }
}

impl Iterator for TrajectoryWalk<'_, '_> {
    type Item = CubeSample;

    fn next(&mut self) -> Option<Self::Item> {
        let cube = self.visits.cube;
        for visit in self.visits.by_ref() {
            if let Some(value) = visit.value {
                return Some(CubeSample {
                    k: visit.k,
                    x: visit.x,
                    y: visit.y,
                    value,
                    num_pixels: 1,
                    exposure_time: cube.exposuretime(visit.k),
                    frame_noise: cube.noise(visit.k),
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.visits.size_hint().1)
    }
}

impl FusedIterator for TrajectoryWalk<'_, '_> {}
