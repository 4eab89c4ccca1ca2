//! Criterion micro-benchmarks for requirement resolution.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use picdeck_requirement::{resolve, Category, Requirement, RequirementBag};
use picdeck_test_utils::toys::{ListIntent, SlotIntent, ToyValue};

const ALL: &[Category] = &[Category::Constant, Category::Attribute, Category::Operation];

/// Bag of `n` requirements mixing mergeable intents, unique intents and
/// repeated direct values. Consistent, so it always resolves.
fn mixed_bag(n: usize) -> Vec<Requirement<ToyValue>> {
    (0..n)
        .map(|i| {
            let small = (i % 64) as u8;
            match i % 4 {
                0 => Requirement::delayed(ListIntent::new([small])),
                1 => Requirement::delayed(SlotIntent {
                    slot: small % 4,
                    value: small % 4,
                }),
                2 => Requirement::Direct(ToyValue::Tag(small)),
                _ => Requirement::Direct(ToyValue::Slot {
                    slot: small % 4,
                    value: small % 4,
                }),
            }
        })
        .collect()
}

/// Benchmark: resolve 100 mixed requirements.
fn bench_resolve_100(c: &mut Criterion) {
    let bag = mixed_bag(100);
    c.bench_function("resolve_100", |b| {
        b.iter(|| {
            let values = resolve(&bag, ALL).unwrap();
            black_box(values);
        });
    });
}

/// Benchmark: resolve 1000 mixed requirements.
fn bench_resolve_1000(c: &mut Criterion) {
    let bag = mixed_bag(1000);
    c.bench_function("resolve_1000", |b| {
        b.iter(|| {
            let values = resolve(&bag, ALL).unwrap();
            black_box(values);
        });
    });
}

/// Benchmark: 500 list intents merging into one value.
fn bench_merge_500_intents(c: &mut Criterion) {
    let bag: RequirementBag<ToyValue> = (0..500u32)
        .map(|i| Requirement::delayed(ListIntent::new([(i % 200) as u8])))
        .collect();
    c.bench_function("merge_500_intents", |b| {
        b.iter(|| {
            let values = bag.resolve(&[Category::Constant]).unwrap();
            black_box(values);
        });
    });
}

criterion_group!(
    benches,
    bench_resolve_100,
    bench_resolve_1000,
    bench_merge_500_intents
);
criterion_main!(benches);
