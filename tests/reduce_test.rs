// SPDX-License-Identifier: MIT

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use halving_reduce::coordinator::{next_size, round_count};
use halving_reduce::wave::round_writes;
use halving_reduce::{PoolError, ReduceError, RoundCoordinator, Sequence, StandardPool};
use proptest::prelude::*;
use test_utils::sequences::{alternating, ascending, serial_sum};
use test_utils::tasks::PanickingTask;

fn reduce_with(values: &[i64], threads: usize, workers: usize) -> i64 {
    let pool = StandardPool::new(threads).unwrap();
    let sequence = Sequence::from(values);
    let mut coordinator = RoundCoordinator::new(&pool, workers).unwrap();
    assert_eq!(coordinator.total_workers(), workers);
    let reduction = coordinator.reduce(&sequence).unwrap();
    reduction.total
}

#[test_log::test]
fn scenario_even_length() {
    assert_eq!(reduce_with(&[1, 2, 3, 4], 2, 2), 10);
}

#[test_log::test]
fn scenario_odd_length() {
    assert_eq!(reduce_with(&[1, 2, 3, 4, 5], 3, 3), 15);
}

#[test_log::test]
fn scenario_single_element() {
    assert_eq!(reduce_with(&[-7], 2, 5), -7);
}

#[test_log::test]
fn scenario_more_workers_than_pairs() {
    let values = ascending(9);
    assert_eq!(reduce_with(&values, 4, 64), 45);
    assert_eq!(reduce_with(&values, 4, 1), 45);
}

#[test_log::test]
fn reference_run() {
    let pool = StandardPool::new(4).unwrap();
    let sequence = Sequence::ascending(1000);
    let reduction = RoundCoordinator::new(&pool, 5)
        .unwrap()
        .reduce(&sequence)
        .unwrap();
    assert_eq!(reduction.total, 500_500);
    assert_eq!(reduction.rounds, 10);
}

#[test_log::test]
fn pool_reused_across_reductions() {
    let pool = StandardPool::new(3).unwrap();
    let mut coordinator = RoundCoordinator::new(&pool, 4).unwrap();
    for n in [1usize, 2, 17, 256, 1001] {
        let values = alternating(n);
        let total = coordinator.reduce(&Sequence::from(values.as_slice())).unwrap().total;
        assert_eq!(total, serial_sum(&values));
    }
}

#[test_log::test]
fn many_sizes_and_worker_counts() {
    let pool = StandardPool::new(8).unwrap();
    for workers in [1usize, 3, 7, 64] {
        let mut coordinator = RoundCoordinator::new(&pool, workers).unwrap();
        for n in 1..=600usize {
            let total = coordinator.reduce(&Sequence::ascending(n)).unwrap().total;
            assert_eq!(total, (n * (n + 1) / 2) as i64, "n = {n}, workers = {workers}");
        }
    }
}

#[test_log::test]
fn reduce_after_shutdown_fails() {
    let mut pool = StandardPool::new(2).unwrap();
    pool.shutdown(Duration::from_secs(5)).unwrap();
    let result = RoundCoordinator::new(&pool, 2)
        .unwrap()
        .reduce(&Sequence::ascending(8));
    assert!(matches!(result, Err(ReduceError::Pool(PoolError::ShutDown))));
}

#[test_log::test]
fn overflow_wraps_like_serial_sum() {
    let values = vec![i64::MAX, i64::MAX, 3, i64::MIN + 1];
    assert_eq!(reduce_with(&values, 2, 2), serial_sum(&values));
}

#[test_log::test]
fn task_panic_aborts_reduction() {
    let pool = StandardPool::new(2).unwrap();
    pool.add_task(Arc::new(PanickingTask::new("worker failed"))).unwrap();

    let result = RoundCoordinator::new(&pool, 2)
        .unwrap()
        .reduce(&Sequence::ascending(64));
    match result {
        Err(ReduceError::Pool(PoolError::TaskPanicked { message, .. })) => {
            assert_eq!(message, "worker failed")
        }
        other => panic!("expected aborted reduction, got {other:?}"),
    }

    // Same pool, fresh sequence: the failure does not leak into later runs.
    let total = RoundCoordinator::new(&pool, 2)
        .unwrap()
        .reduce(&Sequence::ascending(64))
        .unwrap()
        .total;
    assert_eq!(total, 2080);
}

#[test]
fn shrink_terminates_within_log2_rounds() {
    for n in 1..=4096usize {
        let expected = (usize::BITS - (n - 1).leading_zeros()) as usize;
        let expected = if n == 1 { 0 } else { expected };
        assert_eq!(round_count(n), expected, "n = {n}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reduction_equals_serial_sum(
        values in prop::collection::vec(-1_000_000i64..1_000_000, 1..300),
        workers in 1usize..16,
    ) {
        prop_assert_eq!(reduce_with(&values, 3, workers), serial_sum(&values));
    }

    #[test]
    fn worker_count_does_not_change_result(
        values in prop::collection::vec(any::<i64>(), 1..200),
        w1 in 1usize..12,
        w2 in 1usize..12,
    ) {
        prop_assert_eq!(reduce_with(&values, 2, w1), reduce_with(&values, 2, w2));
    }

    #[test]
    fn size_strictly_shrinks(current in 2usize..1_000_000) {
        let next = next_size(current);
        prop_assert!(next < current);
        prop_assert!(next >= 1);
    }

    #[test]
    fn round_writes_are_disjoint(size in 1usize..2000, workers in 1usize..40) {
        let writes = round_writes(size, workers);
        let mut written = HashSet::new();
        for worker in &writes {
            for &i in worker {
                prop_assert!(written.insert(i), "index {} written twice", i);
            }
        }
        // Every pair is folded exactly once.
        prop_assert_eq!(written.len(), size / 2);
        for &i in &written {
            let mirror = size - 1 - i;
            prop_assert!(mirror >= size.div_ceil(2));
            prop_assert!(!written.contains(&mirror));
        }
    }
}
