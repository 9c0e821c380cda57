//! Progress reporting for the parallel search.
//!
//! [`SearchProgress`] is shared by reference between all workers. With the `progress`
//! feature it drives an `indicatif` bar over the trajectory count; without it every call
//! is a no-op, so the driver carries no `cfg` branches of its own.
//!
//! [`fmt_dur`] trims the scaled `Debug` form of a [`Duration`] for log fields and summaries.
use std::time::Duration;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

#[cfg(feature = "progress")]
pub(crate) struct SearchProgress {
    pb: ProgressBar,
}

#[cfg(feature = "progress")]
impl SearchProgress {
    pub(crate) fn new(total: usize) -> Self {
        let pb = ProgressBar::new((total as u64).max(1));
        // A malformed template only loses the styling.
        if let Ok(style) = ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise}",
        ) {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(200));
        SearchProgress { pb }
    }

    #[inline]
    pub(crate) fn inc(&self, n: u64) {
        self.pb.inc(n);
    }

    pub(crate) fn finish(&self) {
        self.pb.disable_steady_tick();
        self.pb.finish_and_clear();
    }
}

#[cfg(not(feature = "progress"))]
pub(crate) struct SearchProgress;

#[cfg(not(feature = "progress"))]
impl SearchProgress {
    pub(crate) fn new(_total: usize) -> Self {
        SearchProgress
    }

    #[inline]
    pub(crate) fn inc(&self, _n: u64) {}

    pub(crate) fn finish(&self) {}
}

/// Format `d` with the unit `Duration` picks for it, to at most two decimals
/// (`"253µs"`, `"42.5ms"`, `"3.14s"`).
pub fn fmt_dur(d: Duration) -> String {
    let text = format!("{d:.2?}");
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let (value, unit) = text.split_at(split);
    let value = if value.contains('.') {
        value.trim_end_matches('0').trim_end_matches('.')
    } else {
        value
    };
    format!("{value}{unit}")
}

#[cfg(test)]
mod progress_bar_test {
    use super::*;

    #[test]
    fn test_fmt_dur() {
        assert_eq!(fmt_dur(Duration::from_micros(253)), "253µs");
        assert_eq!(fmt_dur(Duration::from_micros(42_500)), "42.5ms");
        assert_eq!(fmt_dur(Duration::from_millis(3140)), "3.14s");
        assert_eq!(fmt_dur(Duration::from_secs(120)), "120s");
        assert_eq!(fmt_dur(Duration::from_nanos(7)), "7ns");
        assert_eq!(fmt_dur(Duration::ZERO), "0ns");
    }

    #[test]
    fn test_progress_is_shareable() {
        let progress = SearchProgress::new(4);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| progress.inc(1));
            }
        });
        progress.finish();
    }
}
