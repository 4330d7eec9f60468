// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};

use rampart_array::DynArray;

// Fast mode: FAST_BENCH=1 cargo bench -p benchmarks --bench dyn_array
fn is_fast_mode() -> bool {
    std::env::var("FAST_BENCH")
        .map(|v| v == "1")
        .unwrap_or(false)
}

fn configure_group(group: &mut criterion::BenchmarkGroup<criterion::measurement::WallTime>) {
    if is_fast_mode() {
        group.measurement_time(std::time::Duration::from_millis(500));
        group.sample_size(10);
    } else {
        group.measurement_time(std::time::Duration::from_secs(3));
        group.sample_size(50);
    }
}

fn filled(size: usize) -> DynArray<u64> {
    let mut array = DynArray::with_capacity(size).expect("Failed to with_capacity(..)");
    for i in 0..size {
        array.push_back(i as u64).expect("Failed to push_back(..)");
    }
    array
}

// =============================================================================
// Vec vs DynArray
// =============================================================================

fn bench_push_back_growing(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_back_growing");
    configure_group(&mut group);

    for size in [100, 1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("Vec", size), &size, |b, &s| {
            b.iter(|| {
                let mut vec = Vec::new();
                for i in 0..s {
                    vec.push(i as u64);
                }
                black_box(vec)
            });
        });

        group.bench_with_input(BenchmarkId::new("DynArray", size), &size, |b, &s| {
            b.iter(|| {
                let mut array = DynArray::new();
                for i in 0..s {
                    array.push_back(i as u64).expect("Failed to push_back(..)");
                }
                black_box(array)
            });
        });
    }

    group.finish();
}

fn bench_push_back_reserved(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_back_reserved");
    configure_group(&mut group);

    for size in [100, 1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("Vec", size), &size, |b, &s| {
            let mut vec = Vec::with_capacity(s);
            b.iter(|| {
                vec.clear();
                for i in 0..s {
                    vec.push(i as u64);
                }
                black_box(&vec);
            });
        });

        group.bench_with_input(BenchmarkId::new("DynArray", size), &size, |b, &s| {
            let mut array = DynArray::with_capacity(s).expect("Failed to with_capacity(..)");
            b.iter(|| {
                array.clear();
                for i in 0..s {
                    array.push_back(i as u64).expect("Failed to push_back(..)");
                }
                black_box(&array);
            });
        });
    }

    group.finish();
}

fn bench_clone(c: &mut Criterion) {
    let mut group = c.benchmark_group("clone");
    configure_group(&mut group);

    for size in [100, 1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));

        let vec: Vec<u64> = (0..size as u64).collect();
        group.bench_with_input(BenchmarkId::new("Vec", size), &vec, |b, v| {
            b.iter(|| black_box(v.clone()));
        });

        let array = filled(size);
        group.bench_with_input(BenchmarkId::new("DynArray", size), &array, |b, a| {
            b.iter(|| black_box(a.try_clone().expect("Failed to try_clone()")));
        });
    }

    group.finish();
}

fn bench_clone_from_in_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("clone_from_in_place");
    configure_group(&mut group);

    for size in [100, 1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("Vec", size), &size, |b, &s| {
            let source: Vec<u64> = (0..s as u64).collect();
            let mut target = vec![0u64; s];
            b.iter(|| {
                target.clone_from(&source);
                black_box(&target);
            });
        });

        group.bench_with_input(BenchmarkId::new("DynArray", size), &size, |b, &s| {
            let source = filled(s);
            let mut target = DynArray::<u64>::sized(s).expect("Failed to sized(..)");
            b.iter(|| {
                target
                    .try_clone_from(&source)
                    .expect("Failed to try_clone_from(..)");
                black_box(&target);
            });
        });
    }

    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize");
    configure_group(&mut group);

    for size in [100, 1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("Vec", size), &size, |b, &s| {
            b.iter_batched(
                Vec::<u64>::new,
                |mut vec| {
                    vec.resize(s, 0);
                    black_box(vec)
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("DynArray", size), &size, |b, &s| {
            b.iter_batched(
                DynArray::<u64>::new,
                |mut array| {
                    array.resize(s).expect("Failed to resize(..)");
                    black_box(array)
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    dyn_array_benches,
    bench_push_back_growing,
    bench_push_back_reserved,
    bench_clone,
    bench_clone_from_in_place,
    bench_resize
);

criterion_main!(dyn_array_benches);
