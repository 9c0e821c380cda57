//! # Linear trajectories
//!
//! A [`LinearTrajectory`] is a candidate straight-line motion across the frames of a cube,
//! expressed as slope and intercept on each spatial axis. The intercepts are the position at
//! the reference frame (frame 0) and the slopes are in pixels per timestamp unit.
//!
//! ```text
//! x(t) = round(x_intercept + x_slope · t)
//! y(t) = round(y_intercept + y_slope · t)
//! ```
//!
//! A trajectory carries no reference to a cube; it is walked over one with
//! [`TrajectoryWalk`](crate::cube_iterator::TrajectoryWalk).
use std::fmt;

use serde::{Deserialize, Serialize};

/// Straight-line motion vector in the `(x, y)` plane as a function of time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LinearTrajectory {
    pub x_slope: f64,
    pub x_intercept: f64,
    pub y_slope: f64,
    pub y_intercept: f64,
}

impl LinearTrajectory {
    pub fn new(x_slope: f64, x_intercept: f64, y_slope: f64, y_intercept: f64) -> Self {
        LinearTrajectory {
            x_slope,
            x_intercept,
            y_slope,
            y_intercept,
        }
    }

    /// Pixel position reached after a time offset `t` from the reference frame.
    ///
    /// Coordinates are rounded half away from zero and may be negative or beyond the
    /// frame extents; bounds are the concern of the cube.
    #[inline]
    pub fn position(&self, t: f64) -> (i64, i64) {
        (
            (self.x_intercept + self.x_slope * t).round() as i64,
            (self.y_intercept + self.y_slope * t).round() as i64,
        )
    }

    /// Apparent speed in pixels per timestamp unit.
    pub fn speed(&self) -> f64 {
        self.x_slope.hypot(self.y_slope)
    }
}

impl fmt::Display for LinearTrajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x-slope, x-intercept, y-slope, y-intercept) = ({}, {}, {}, {})",
            self.x_slope, self.x_intercept, self.y_slope, self.y_intercept
        )
    }
}

#[cfg(test)]
mod trajectory_test {
    use super::*;

    #[test]
    fn test_position() {
        let traj = LinearTrajectory::new(0.5, 10.0, -0.25, 4.0);
        assert_eq!(traj.position(0.0), (10, 4));
        assert_eq!(traj.position(1.0), (11, 4)); // 10.5 rounds away from zero
        assert_eq!(traj.position(4.0), (12, 3));
        assert_eq!(traj.position(20.0), (20, -1));
    }

    #[test]
    fn test_static_trajectory() {
        let traj = LinearTrajectory::new(0.0, 3.0, 0.0, 7.0);
        for t in [0.0, 1.0, 1e6] {
            assert_eq!(traj.position(t), (3, 7));
        }
        assert_eq!(traj.speed(), 0.0);
    }

    #[test]
    fn test_speed() {
        let traj = LinearTrajectory::new(3.0, 0.0, 4.0, 0.0);
        assert_eq!(traj.speed(), 5.0);
    }
}
