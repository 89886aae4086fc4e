//! Benchmarks for cover computation and membership queries
//!
//! 1. **`compute_bins`**: bound derivation, geometry and coordinate enumeration
//!    for growing tables and dimensions
//! 2. **`evaluate`**: slicing a table by every bin of a layout
//!
//! Data is uniform in `[0, 1)` and generated from a fixed seed so runs are
//! comparable.

#![allow(missing_docs)] // Criterion macros generate undocumented functions

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use cubical_cover::prelude::*;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use std::sync::OnceLock;

/// Seed for table generation. Reads `COVER_BENCH_SEED` (decimal or 0x-hex), defaulting to 0xC0DE.
fn get_benchmark_seed() -> u64 {
    static SEED: OnceLock<u64> = OnceLock::new();
    *SEED.get_or_init(|| {
        std::env::var("COVER_BENCH_SEED")
            .ok()
            .and_then(|s| {
                let s = s.trim();
                s.strip_prefix("0x")
                    .or_else(|| s.strip_prefix("0X"))
                    .map_or_else(|| s.parse().ok(), |hex| u64::from_str_radix(hex, 16).ok())
            })
            .unwrap_or(0xC0DE)
    })
}

fn uniform_table(n_rows: usize, dims: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((n_rows, dims + 1), |(row, column)| {
        if column == 0 {
            row as f64
        } else {
            rng.random::<f64>()
        }
    })
}

fn benchmark_compute_bins(c: &mut Criterion) {
    let seed = get_benchmark_seed();
    let mut group = c.benchmark_group("compute_bins");

    for dims in [1_usize, 2, 3] {
        for n_rows in [1_000_usize, 10_000, 100_000] {
            let data = uniform_table(n_rows, dims, seed);
            let config = CoverConfig::new(10, 0.25).unwrap();
            group.throughput(Throughput::Elements(n_rows as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{dims}d"), n_rows),
                &data,
                |b, data| b.iter(|| black_box(compute_bins(&config, data.view()).unwrap())),
            );
        }
    }

    group.finish();
}

fn benchmark_evaluate_all_bins(c: &mut Criterion) {
    let seed = get_benchmark_seed();
    let mut group = c.benchmark_group("evaluate_all_bins");

    for n_cubes in [5_usize, 10, 15] {
        let data = uniform_table(10_000, 2, seed);
        let layout = compute_bins(&CoverConfig::new(n_cubes, 0.5).unwrap(), data.view()).unwrap();
        group.throughput(Throughput::Elements(layout.len() as u64));
        group.bench_with_input(BenchmarkId::new("2d", n_cubes), &layout, |b, layout| {
            b.iter(|| {
                for (_, rows) in layout.bins(data.view()) {
                    black_box(rows.unwrap());
                }
            });
        });
    }

    group.finish();
}

fn benchmark_single_bin(c: &mut Criterion) {
    let data = uniform_table(100_000, 3, get_benchmark_seed());
    let layout = compute_bins(&CoverConfig::new(8, 0.3).unwrap(), data.view()).unwrap();
    let coordinate = BinCoordinate::from([4, 4, 4]);

    c.bench_function("member_rows_3d_100k", |b| {
        b.iter(|| black_box(member_rows(data.view(), layout.geometry(), &coordinate).unwrap()));
    });
}

criterion_group!(
    benches,
    benchmark_compute_bins,
    benchmark_evaluate_all_bins,
    benchmark_single_bin
);
criterion_main!(benches);
