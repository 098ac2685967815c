//! Performance benchmarks for simulations and scans
//!
//! # What We're Measuring
//!
//! 1. **Single run**: one co-culture simulation, adaptive vs fixed-step
//! 2. **Scan scaling**: rows of an `a_e × a_c` grid, sequential vs parallel
//! 3. **Cache hits**: a scan whose rows were all computed before
//!
//! # Expected Results
//!
//! - Parallel scans approach `rows / threads` times the single-run cost
//! - A fully cached scan costs the fingerprinting only, far below a run
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench --bench scan_performance
//!
//! # Only scan scaling
//! cargo bench --bench scan_performance scan
//! ```

use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use coculture::models::coculture::{build_model, factory, CocultureParameters, A_C, A_E};
use coculture::prelude::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// =================================================================================================
// Fixtures
// =================================================================================================

fn time_points() -> Vec<f64> {
    linspace(0.0, 14.0, 141)
}

/// Square `a_e × a_c` grid with `side²` rows
fn grid(side: usize) -> ScanTable {
    let axis = linspace(0.0, 2.0, side);
    ScanTable::grid([(A_E, axis.clone()), (A_C, axis)]).unwrap()
}

// =================================================================================================
// Benchmark Functions
// =================================================================================================

fn benchmark_single_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("Single co-culture run");
    let time = time_points();

    let solvers = [
        ("dormand-prince", SolverConfiguration::dormand_prince()),
        ("rk4-20", SolverConfiguration::rk4(20)),
    ];

    for (label, config) in solvers {
        group.bench_function(label, |b| {
            // Setup outside the measurement
            let model = build_model(&CocultureParameters::default()).unwrap();
            let mut simulator = Simulator::new(model).with_solver(config.clone());

            b.iter(|| {
                simulator
                    .simulate_time_course(black_box(&time))
                    .unwrap()
                    .get_result()
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Rows scale as side², 4 → 64 rows
fn benchmark_scan_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scan scaling");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    let time = time_points();

    for side in [2, 4, 8] {
        let table = grid(side);
        group.throughput(Throughput::Elements(table.len() as u64));

        for (mode, options) in [
            ("sequential", ScanOptions::default().sequential()),
            ("parallel", ScanOptions::default()),
        ] {
            group.bench_with_input(BenchmarkId::new(mode, table.len()), &table, |b, table| {
                b.iter(|| {
                    Scan::time_course(
                        factory(CocultureParameters::default()),
                        black_box(table),
                        &time,
                        &options,
                    )
                    .unwrap()
                });
            });
        }
    }

    group.finish();
}

fn benchmark_cached_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("Cached scan");

    let time = time_points();
    let table = grid(4);
    let cache = Arc::new(MemoryCache::new());
    let options = ScanOptions::default().with_cache(cache);

    // Warm the cache once
    Scan::time_course(factory(CocultureParameters::default()), &table, &time, &options).unwrap();

    group.bench_function("16 rows, all hits", |b| {
        b.iter(|| {
            Scan::time_course(
                factory(CocultureParameters::default()),
                black_box(&table),
                &time,
                &options,
            )
            .unwrap()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_run,
    benchmark_scan_scaling,
    benchmark_cached_scan,
);
criterion_main!(benches);
