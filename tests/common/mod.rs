#![allow(dead_code)]

use approx::assert_relative_eq;
use camino::Utf8PathBuf;
use cubescan::search::ScoredTrajectory;
use tempfile::TempDir;

/// Pixels of a `size_x × size_y × size_k` cube where every pixel holds `value`.
pub fn constant_pixels(size_x: usize, size_y: usize, size_k: usize, value: f32) -> Vec<f32> {
    vec![value; size_x * size_y * size_k]
}

/// Pixels of a cube holding `background` everywhere except along the line
/// `x = x0 + vx·k`, `y = y0 + vy·k`, where they hold `source`.
pub fn moving_source_pixels(
    (size_x, size_y, size_k): (usize, usize, usize),
    (x0, y0): (usize, usize),
    (vx, vy): (usize, usize),
    background: f32,
    source: f32,
) -> Vec<f32> {
    let mut pixels = constant_pixels(size_x, size_y, size_k, background);
    for k in 0..size_k {
        let (x, y) = (x0 + vx * k, y0 + vy * k);
        if x < size_x && y < size_y {
            pixels[(k * size_y + y) * size_x + x] = source;
        }
    }
    pixels
}

/// UTF-8 path of `name` inside `dir`.
pub fn tmp_path(dir: &TempDir, name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("temporary path is not UTF-8")
}

/// Write `content` to `name` inside `dir` and return its path.
pub fn write_text(dir: &TempDir, name: &str, content: &str) -> Utf8PathBuf {
    let path = tmp_path(dir, name);
    std::fs::write(&path, content).expect("cannot write test fixture");
    path
}

pub fn assert_records_close(
    actual: &[ScoredTrajectory],
    expected: &[ScoredTrajectory],
    epsilon: f64,
) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert_eq!(a.id, e.id);
        assert_eq!(a.frame_hits, e.frame_hits);
        assert_eq!(a.trajectory, e.trajectory);
        assert_relative_eq!(a.signal, e.signal, epsilon = epsilon);
        if e.snr.is_nan() {
            assert!(a.snr.is_nan());
        } else {
            assert_relative_eq!(a.snr, e.snr, epsilon = epsilon);
        }
    }
}
