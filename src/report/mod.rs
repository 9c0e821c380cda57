//! # Reporting search results
//!
//! Everything that turns a [`SearchOutcome`](crate::search::SearchOutcome) into something a
//! person or another program reads:
//!
//! * [`csv_io`](crate::report::csv_io) – CSV export/import of the scored trajectories.
//! * [`summary`](crate::report::summary) – Count and throughput of a search.
//! * [`trace`](crate::report::trace) – Per-frame positions and values of one trajectory.
//! * [`top_by_snr`] – Best-scoring records.
use std::cmp::Ordering;

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::search::ScoredTrajectory;

pub mod csv_io;
pub mod summary;
pub mod trace;

pub use csv_io::{read_records, read_records_from_path, write_records, write_records_to_path};
pub use summary::SearchSummary;
pub use trace::TrajectoryTrace;

/// Descending SNR, `NaN` scores last, ties broken by ascending id.
fn by_snr_desc(a: &ScoredTrajectory, b: &ScoredTrajectory) -> Ordering {
    let key = |r: &ScoredTrajectory| (!r.snr.is_nan(), OrderedFloat(r.snr));
    key(b).cmp(&key(a)).then(a.id.cmp(&b.id))
}

/// The `n` records with the highest SNR, best first.
///
/// `NaN` scores rank below every number; equal scores keep draw order.
///
/// ```rust
/// use cubescan::report::top_by_snr;
/// use cubescan::search::ScoredTrajectory;
///
/// let records: Vec<ScoredTrajectory> = [3.0, f64::NAN, 7.0, 1.0]
///     .iter()
///     .enumerate()
///     .map(|(id, &snr)| ScoredTrajectory { id, snr, ..Default::default() })
///     .collect();
///
/// let best: Vec<usize> = top_by_snr(&records, 2).iter().map(|r| r.id).collect();
/// assert_eq!(best, vec![2, 0]);
/// ```
pub fn top_by_snr(records: &[ScoredTrajectory], n: usize) -> Vec<ScoredTrajectory> {
    records
        .iter()
        .copied()
        .sorted_by(by_snr_desc)
        .take(n)
        .collect()
}
