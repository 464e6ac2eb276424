// SPDX-License-Identifier: MIT

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use halving_reduce::{RoundCoordinator, Sequence, StandardPool};

/// Scaling wave tasks per round on a fixed pool and length.
fn bench_worker_count(c: &mut Criterion) {
    let pool = StandardPool::new(4).expect("pool");
    let length = 1 << 17;
    let mut group = c.benchmark_group("reduce_workers");
    group.throughput(Throughput::Elements(length as u64));
    for workers in [1usize, 2, 4, 8, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter_batched(
                || Sequence::ascending(length),
                |sequence| {
                    let mut coordinator = RoundCoordinator::new(&pool, workers).unwrap();
                    coordinator.reduce(&sequence).unwrap()
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

/// Scaling sequence length with threads and workers fixed at 4.
fn bench_length(c: &mut Criterion) {
    let pool = StandardPool::new(4).expect("pool");
    let mut group = c.benchmark_group("reduce_length");
    for length in [1_000usize, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(length as u64));
        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, &length| {
            b.iter_batched(
                || Sequence::ascending(length),
                |sequence| {
                    let mut coordinator = RoundCoordinator::new(&pool, 4).unwrap();
                    coordinator.reduce(&sequence).unwrap()
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_worker_count, bench_length);
criterion_main!(benches);
