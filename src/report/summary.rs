use std::{fmt, time::Duration};

use crate::search::progress_bar::fmt_dur;

/// Size and throughput of a search.
///
/// Display
/// -----------------
/// * `format!("{}", summary)` – compact single line:
///   ```text
///   trajectories=100000, eval_time=3.14s, trajectories/s=31847.1
///   ```
/// * `format!("{:#}", summary)` – the three-line report printed by the command line tool:
///   ```text
///   #of vectors = 100000
///   execution time (sec) = 3.14
///   vectors/sec = 31847.1
///   ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSummary {
    pub trajectories: usize,
    pub total_eval_time: Duration,
}

impl SearchSummary {
    pub fn new(trajectories: usize, total_eval_time: Duration) -> Self {
        SearchSummary {
            trajectories,
            total_eval_time,
        }
    }

    /// Evaluated trajectories per second of evaluation time
    /// (`inf` when no time was measured).
    pub fn trajectories_per_second(&self) -> f64 {
        self.trajectories as f64 / self.total_eval_time.as_secs_f64()
    }
}

impl fmt::Display for SearchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "#of vectors = {}", self.trajectories)?;
            writeln!(
                f,
                "execution time (sec) = {}",
                self.total_eval_time.as_secs_f64()
            )?;
            write!(f, "vectors/sec = {:.1}", self.trajectories_per_second())
        } else {
            write!(
                f,
                "trajectories={}, eval_time={}, trajectories/s={:.1}",
                self.trajectories,
                fmt_dur(self.total_eval_time),
                self.trajectories_per_second()
            )
        }
    }
}

#[cfg(test)]
mod summary_test {
    use super::*;

    #[test]
    fn test_throughput() {
        let s = SearchSummary::new(1_000, Duration::from_millis(250));
        assert_eq!(s.trajectories_per_second(), 4_000.0);
        assert!(SearchSummary::new(5, Duration::ZERO)
            .trajectories_per_second()
            .is_infinite());
    }

    #[test]
    fn test_display() {
        let s = SearchSummary::new(1_000, Duration::from_millis(250));
        assert_eq!(
            format!("{s}"),
            "trajectories=1000, eval_time=250ms, trajectories/s=4000.0"
        );
        assert_eq!(
            format!("{s:#}"),
            "#of vectors = 1000\nexecution time (sec) = 0.25\nvectors/sec = 4000.0"
        );
    }
}
