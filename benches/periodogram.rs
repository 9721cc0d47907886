//! Benchmarks for periodogram evaluation
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lomb_panda::data::model::{FrequencyGrid, Sample, SampleSet};
use lomb_panda::periodogram::{compute, EngineOptions};

fn samples(n: usize) -> SampleSet {
    SampleSet::from_samples((0..n).map(|i| {
        let t = i as f64 + 0.4 * (0.7 * i as f64).sin();
        Sample {
            amplitude: (std::f64::consts::TAU * 0.17 * t).sin(),
            time: t,
        }
    }))
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("lomb_scargle");
    let set = samples(500);

    for &points in &[1_000usize, 10_000, 100_000] {
        let grid = FrequencyGrid::new(0.001, 0.5, points).unwrap();
        group.throughput(Throughput::Elements(points as u64));

        group.bench_with_input(BenchmarkId::new("sequential", points), &grid, |b, grid| {
            b.iter(|| compute(black_box(&set), grid, EngineOptions::default()).unwrap())
        });

        let parallel = EngineOptions {
            parallel: true,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("parallel", points), &grid, |b, grid| {
            b.iter(|| compute(black_box(&set), grid, parallel).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute);
criterion_main!(benches);
