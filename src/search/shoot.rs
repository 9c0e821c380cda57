use std::time::{Duration, Instant};

use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::{
    evaluate_trajectory, progress_bar::fmt_dur, progress_bar::SearchProgress, ScoredTrajectory,
    SearchOutcome, SearchParams,
};
use crate::{
    cube::Cube, cubescan_errors::CubeScanError, slope_distribution::SlopeDistribution,
    trajectory::LinearTrajectory,
};

/// Draw and score `params.num_trajectories` random trajectories through `cube`.
///
/// Arguments
/// -----------------
/// * `cube`: the cube to search, shared read-only by all workers.
/// * `slopes`: distribution of the `(x_slope, y_slope)` pairs.
/// * `params`: trajectory count, pool size, base seed and noise model.
///
/// Return
/// ----------
/// * A [`SearchOutcome`] holding exactly `num_trajectories` records, record `i` being the
///   `i`-th drawn trajectory, and the evaluation time summed over workers.
/// * [`CubeScanError::ThreadPoolError`] if the worker pool cannot be created.
///
/// Notes
/// ----------
/// * Worker `w` handles the contiguous block `[w·c, (w+1)·c)` with `c = ⌈N / num_threads⌉`
///   and seeds its generator with `base_seed + w`; the records are therefore reproducible
///   for a fixed `(N, num_threads, base_seed)`.
/// * Only the walk and the scoring are timed, not the sampling.
///
/// See also
/// ------------
/// * [`evaluate_trajectory`] – Scoring of a single trajectory.
/// * [`SlopeSampler`](crate::slope_distribution::SlopeSampler) – Startup choice of the slope
///   distribution.
pub fn shoot_trajectories<D>(
    cube: &Cube<'_>,
    slopes: &D,
    params: &SearchParams,
) -> Result<SearchOutcome, CubeScanError>
where
    D: SlopeDistribution + Sync,
{
    let n = params.num_trajectories;
    let num_threads = params.num_threads.max(1);
    let block_len = n.div_ceil(num_threads).max(1);
    let (size_x, size_y, size_k) = cube.size();

    info!(
        trajectories = n,
        threads = num_threads,
        base_seed = params.base_seed,
        size_x,
        size_y,
        size_k,
        "starting trajectory search"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()?;

    let mut records = vec![ScoredTrajectory::default(); n];
    let progress = SearchProgress::new(n);
    let wall_clock = Instant::now();

    let total_eval_time: Duration = pool.install(|| {
        records
            .par_chunks_mut(block_len)
            .enumerate()
            .map(|(worker, block)| {
                let mut rng = StdRng::seed_from_u64(params.base_seed.wrapping_add(worker as u64));
                let first_id = worker * block_len;
                let mut elapsed = Duration::ZERO;

                for (offset, slot) in block.iter_mut().enumerate() {
                    let (x_slope, y_slope) = slopes.sample_slopes(&mut rng);
                    let x_intercept = rng.random_range(0..size_x) as f64;
                    let y_intercept = rng.random_range(0..size_y) as f64;
                    let trajectory =
                        LinearTrajectory::new(x_slope, x_intercept, y_slope, y_intercept);

                    let start = Instant::now();
                    let info = evaluate_trajectory(cube, trajectory, &params.noise_model);
                    *slot = ScoredTrajectory::new(first_id + offset, trajectory, info);
                    elapsed += start.elapsed();

                    progress.inc(1);
                }

                debug!(
                    worker,
                    trajectories = block.len(),
                    elapsed = %fmt_dur(elapsed),
                    "worker done"
                );
                elapsed
            })
            .sum::<Duration>()
    });

    progress.finish();

    if !records.is_empty() && records.iter().all(|r| r.snr.is_nan()) {
        warn!("every trajectory scored NaN; the cube may be fully masked");
    }

    info!(
        trajectories = n,
        eval_time = %fmt_dur(total_eval_time),
        wall_time = %fmt_dur(wall_clock.elapsed()),
        "trajectory search done"
    );

    Ok(SearchOutcome {
        total_eval_time,
        records,
    })
}

#[cfg(test)]
mod shoot_test {
    use super::*;
    use crate::{
        cube::FrameMetadata,
        slope_distribution::{EmpiricalSlopes, SlopeSampler},
    };

    fn params(n: usize, threads: usize) -> SearchParams {
        SearchParams::builder()
            .num_trajectories(n)
            .num_threads(threads)
            .build()
            .unwrap()
    }

    #[test]
    fn test_record_count_and_ids() {
        let pixels = vec![1.0; 16 * 16 * 4];
        let cube = Cube::new(16, 16, 4, &pixels, FrameMetadata::uniform(4)).unwrap();

        for (n, threads) in [(1, 1), (10, 3), (257, 4), (3, 8)] {
            let outcome = shoot_trajectories(&cube, &SlopeSampler::default(), &params(n, threads))
                .unwrap();
            assert_eq!(outcome.records.len(), n);
            for (i, r) in outcome.records.iter().enumerate() {
                assert_eq!(r.id, i);
            }
        }
    }

    #[test]
    fn test_intercepts_inside_frame() {
        let pixels = vec![1.0; 7 * 5 * 2];
        let cube = Cube::new(7, 5, 2, &pixels, FrameMetadata::uniform(2)).unwrap();
        let outcome =
            shoot_trajectories(&cube, &SlopeSampler::default(), &params(2_000, 4)).unwrap();

        for r in &outcome.records {
            let t = r.trajectory;
            assert!((0.0..7.0).contains(&t.x_intercept));
            assert!((0.0..5.0).contains(&t.y_intercept));
            assert_eq!(t.x_intercept.fract(), 0.0);
            // frame 0 is always hit since the intercept is inside the frame
            assert!(r.frame_hits >= 1);
        }
    }

    #[test]
    fn test_static_slopes_hit_every_frame() {
        let pixels = vec![100.0; 10 * 10 * 5];
        let cube = Cube::new(10, 10, 5, &pixels, FrameMetadata::uniform(5)).unwrap();
        let still = EmpiricalSlopes::from_samples(&[(0.0, 0.0, 1.0)]).unwrap();

        let outcome = shoot_trajectories(&cube, &still, &params(50, 2)).unwrap();
        for r in &outcome.records {
            assert_eq!(r.frame_hits, 5);
            assert_eq!(r.signal, 500.0);
        }
    }

    #[test]
    fn test_reproducible() {
        let pixels: Vec<f32> = (0..32 * 32 * 6).map(|i| (i % 97) as f32).collect();
        let cube = Cube::new(32, 32, 6, &pixels, FrameMetadata::uniform(6)).unwrap();
        let p = params(1_000, 4);

        let a = shoot_trajectories(&cube, &SlopeSampler::default(), &p).unwrap();
        let b = shoot_trajectories(&cube, &SlopeSampler::default(), &p).unwrap();
        assert_eq!(a.records, b.records);

        let other_seed = SearchParams {
            base_seed: 124,
            ..p.clone()
        };
        let c = shoot_trajectories(&cube, &SlopeSampler::default(), &other_seed).unwrap();
        assert_ne!(a.records, c.records);
    }
}
