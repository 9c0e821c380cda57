use std::fmt;

use crate::{
    cube::Cube,
    cube_iterator::{FrameVisit, FrameVisits},
    trajectory::LinearTrajectory,
};

/// Frame-by-frame positions and pixel values of a trajectory through a cube.
///
/// Out-of-range frames are kept and shown as `OOR`:
///
/// ```text
/// Vector (x-slope, x-intercept, y-slope, y-intercept): 1, 3, 0, 3
/// Values (x, y, k):
///  [ 3, 3, 0 ] = 12.5
///  [ 4, 3, 1 ] = NaN
///  [ 6, 3, 2 ] = OOR
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryTrace {
    pub trajectory: LinearTrajectory,
    pub visits: Vec<FrameVisit>,
}

impl TrajectoryTrace {
    pub fn new(cube: &Cube<'_>, trajectory: LinearTrajectory) -> Self {
        TrajectoryTrace {
            trajectory,
            visits: FrameVisits::new(cube, trajectory, 0.0).collect(),
        }
    }

    /// Number of frames where the trajectory is inside the cube.
    pub fn frames_in_range(&self) -> usize {
        self.visits.iter().filter(|v| v.in_range()).count()
    }
}

impl fmt::Display for TrajectoryTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.trajectory;
        writeln!(
            f,
            "Vector (x-slope, x-intercept, y-slope, y-intercept): {}, {}, {}, {}",
            t.x_slope, t.x_intercept, t.y_slope, t.y_intercept
        )?;
        write!(f, "Values (x, y, k):")?;
        for v in &self.visits {
            write!(f, "\n [ {}, {}, {} ] = ", v.x, v.y, v.k)?;
            match v.value {
                Some(value) => write!(f, "{value}")?,
                None => write!(f, "OOR")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod trace_test {
    use super::*;
    use crate::cube::FrameMetadata;

    #[test]
    fn test_trace_display() {
        let mut pixels = vec![1.0; 5 * 5 * 3];
        pixels[3 * 5 + 3] = 12.5; // (3, 3, 0)
        pixels[25 + 3 * 5 + 4] = f32::NAN; // (4, 3, 1)
        let cube = Cube::new(5, 5, 3, &pixels, FrameMetadata::uniform(3)).unwrap();
        let trace = TrajectoryTrace::new(&cube, LinearTrajectory::new(1.0, 3.0, 0.0, 3.0));

        assert_eq!(trace.visits.len(), 3);
        assert_eq!(trace.frames_in_range(), 2);
        assert_eq!(
            trace.to_string(),
            "Vector (x-slope, x-intercept, y-slope, y-intercept): 1, 3, 0, 3\n\
             Values (x, y, k):\n \
             [ 3, 3, 0 ] = 12.5\n \
             [ 4, 3, 1 ] = NaN\n \
             [ 5, 3, 2 ] = OOR"
        );
    }
}
