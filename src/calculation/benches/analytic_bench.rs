//! Benchmarks for the analytic trajectory and dump parsing.
//!
//! Run with: `cargo bench -p penning_calc`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ndarray::Array3;

use penning_calc::analytic::{InitialConditions, TimeGrid, Trajectory};
use penning_calc::arma::{parse_cube, save_cube};
use penning_calc::constants::TrapParams;

/// Benchmark the closed form over increasingly fine grids
fn bench_analytic(c: &mut Criterion) {
    let params = TrapParams::default();
    let init = InitialConditions::default();

    let mut group = c.benchmark_group("analytic_trajectory");
    for dt in [0.1, 0.01, 0.001] {
        let grid = TimeGrid::new(100.0, dt);
        group.throughput(Throughput::Elements(grid.sample_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(dt), &grid, |b, grid| {
            b.iter(|| Trajectory::analytic(&params, &init, grid))
        });
    }
    group.finish();
}

/// Benchmark decoding a two-particle position dump
fn bench_parse_cube(c: &mut Criterion) {
    let cube = Array3::from_shape_fn((10_000, 3, 2), |(s, r, p)| (s + r + p) as f64);
    let path = std::env::temp_dir().join("penning_bench_cube.bin");
    save_cube(&path, &cube).expect("write bench cube");
    let bytes = std::fs::read(&path).expect("read bench cube");

    c.bench_function("parse_cube_10000x3x2", |b| b.iter(|| parse_cube(&bytes)));
}

criterion_group!(benches, bench_analytic, bench_parse_cube);
criterion_main!(benches);
