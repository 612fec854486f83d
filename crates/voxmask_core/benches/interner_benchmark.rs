//! # Interner Benchmark
//!
//! A 256^3 label volume with heavy overlap runs tens of millions of
//! `resolve` calls per load. The hot case is a hit on an existing key.
//!
//! Run with: `cargo bench --package voxmask_core`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voxmask_core::MaskInterner;
use voxmask_shared::{InternerConfig, MaskId};

const OBJECTS: u16 = 64;

fn fresh_interner() -> MaskInterner {
    MaskInterner::with_config(InternerConfig::starting_at(MaskId(OBJECTS + 1)))
}

/// Benchmark: pair lookups that always hit.
fn bench_resolve_hit(c: &mut Criterion) {
    let interner = fresh_interner();
    let _ = interner.resolve(MaskId(2), MaskId(1));

    c.bench_function("resolve_pair_hit", |b| {
        b.iter(|| black_box(interner.resolve(black_box(MaskId(2)), black_box(MaskId(1)))));
    });
}

/// Benchmark: growing composites to increasing depth.
fn bench_resolve_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_growth");

    for depth in [2u16, 4, 8, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let interner = fresh_interner();
                let mut current = MaskId(1);
                for object in 2..=depth {
                    current = interner.resolve(MaskId(object), current).unwrap_or(current);
                }
                black_box(current)
            });
        });
    }

    group.finish();
}

/// Benchmark: a scan line where neighbouring voxels share most objects.
fn bench_scan_line(c: &mut Criterion) {
    c.bench_function("scan_line_4096", |b| {
        b.iter(|| {
            let interner = fresh_interner();
            let mut line = [0u16; 4096];
            for (x, voxel) in line.iter_mut().enumerate() {
                let base = (x / 64) as u16 % OBJECTS + 1;
                *voxel = base;
                for object in [base % OBJECTS + 1, (base + 7) % OBJECTS + 1] {
                    if let Some(id) = interner.resolve(MaskId(object), MaskId(*voxel)) {
                        *voxel = id.raw();
                    }
                }
            }
            black_box(interner.live_count())
        });
    });
}

criterion_group!(benches, bench_resolve_hit, bench_resolve_growth, bench_scan_line);
criterion_main!(benches);
