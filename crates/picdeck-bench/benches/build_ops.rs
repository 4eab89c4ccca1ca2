//! Criterion benchmarks for the full build pipeline.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use picdeck_bench::wakefield_profile;
use picdeck_test_utils::fixtures::{shipped_store, AcceptAll};

/// Benchmark: build a 4-ion setup against the shipped schemas.
fn bench_build_4_ions(c: &mut Criterion) {
    let store = shipped_store();
    let mut sim = wakefield_profile(4).unwrap();

    // First build seals and is the only one that can fail on declarations.
    sim.build_with(&store, None).unwrap();

    c.bench_function("build_4_ions", |b| {
        b.iter(|| {
            let rendered = sim.build_with(&store, None).unwrap();
            black_box(rendered);
        });
    });
}

/// Benchmark: build a 32-ion setup against the shipped schemas.
fn bench_build_32_ions(c: &mut Criterion) {
    let store = shipped_store();
    let mut sim = wakefield_profile(32).unwrap();
    sim.build_with(&store, None).unwrap();

    c.bench_function("build_32_ions", |b| {
        b.iter(|| {
            let rendered = sim.build_with(&store, None).unwrap();
            black_box(rendered);
        });
    });
}

/// Benchmark: the same 32-ion build with validation switched off, to
/// separate resolution and rendering from schema checks.
fn bench_build_32_ions_unvalidated(c: &mut Criterion) {
    let mut sim = wakefield_profile(32).unwrap();
    sim.build_with(&AcceptAll, None).unwrap();

    c.bench_function("build_32_ions_unvalidated", |b| {
        b.iter(|| {
            let rendered = sim.build_with(&AcceptAll, None).unwrap();
            black_box(rendered);
        });
    });
}

/// Benchmark: declare a fresh 32-ion setup from scratch.
fn bench_declare_32_ions(c: &mut Criterion) {
    c.bench_function("declare_32_ions", |b| {
        b.iter(|| {
            let sim = wakefield_profile(32).unwrap();
            black_box(sim);
        });
    });
}

criterion_group!(
    benches,
    bench_build_4_ions,
    bench_build_32_ions,
    bench_build_32_ions_unvalidated,
    bench_declare_32_ions
);
criterion_main!(benches);
