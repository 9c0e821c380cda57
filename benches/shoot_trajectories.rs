use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cubescan::cube::{Cube, FrameMetadata};
use cubescan::search::{shoot_trajectories, SearchParams};
use cubescan::slope_distribution::SlopeSampler;

/// Full search over a mid-size cube, for increasing worker counts.
fn bench_threads(c: &mut Criterion) {
    let (sx, sy, sk) = (256, 256, 32);
    let pixels: Vec<f32> = (0..sx * sy * sk).map(|i| (i % 97) as f32).collect();
    let cube = Cube::new(sx, sy, sk, &pixels, FrameMetadata::uniform(sk)).expect("valid cube");
    let slopes = SlopeSampler::default();

    let mut group = c.benchmark_group("shoot_trajectories");
    group.sample_size(10);
    for threads in [1, 2, 4, 8] {
        let params = SearchParams::builder()
            .num_trajectories(20_000)
            .num_threads(threads)
            .build()
            .expect("valid parameters");
        group.bench_function(format!("20k_trajectories/{threads}_threads"), |b| {
            b.iter(|| black_box(shoot_trajectories(&cube, &slopes, &params).ok()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_threads);
criterion_main!(benches);
