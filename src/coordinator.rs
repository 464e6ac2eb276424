// SPDX-License-Identifier: MIT

//! Round-by-round driver of the halving reduction.

use std::sync::Arc;

use log::debug;

use crate::error::{ReduceError, Result};
use crate::pools::standardpool::StandardPool;
use crate::sequence::Sequence;
use crate::wave::{WaveTask, WorkerAssignment};

/// Logical size of the round following one of size `current`.
pub fn next_size(current: usize) -> usize {
    current.div_ceil(2)
}

/// Rounds needed to reduce `n` elements to one, i.e. `ceil(log2(n))`.
pub fn round_count(n: usize) -> usize {
    let mut size = n;
    let mut rounds = 0;
    while size > 1 {
        size = next_size(size);
        rounds += 1;
    }
    rounds
}

/// Summary of a finished round, handed to the [`RoundObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    /// One-based round number.
    pub round: usize,
    /// Logical size the round worked on.
    pub size_before: usize,
    /// Logical size of the next round.
    pub size_after: usize,
}

/// Sink notified after the barrier of every round.
pub trait RoundObserver {
    fn on_round(&mut self, report: &RoundReport, sequence: &Sequence);
}

/// Outcome of a completed reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reduction {
    /// Value left at index 0.
    pub total: i64,
    /// Rounds executed, zero for a single element.
    pub rounds: usize,
}

/// Drives rounds of [`WaveTask`]s on a borrowed pool.
pub struct RoundCoordinator<'p> {
    pool: &'p StandardPool,
    total_workers: usize,
    observer: Option<Box<dyn RoundObserver + 'p>>,
}

impl<'p> RoundCoordinator<'p> {
    /// `total_workers` is the number of wave tasks per round and may differ
    /// from the pool's thread count.
    pub fn new(pool: &'p StandardPool, total_workers: usize) -> Result<Self> {
        if total_workers == 0 {
            return Err(ReduceError::InvalidWorkerCount);
        }
        Ok(RoundCoordinator {
            pool,
            total_workers,
            observer: None,
        })
    }

    pub fn with_observer(mut self, observer: Box<dyn RoundObserver + 'p>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn total_workers(&self) -> usize {
        self.total_workers
    }

    /// Reduces `sequence` in place and returns the value left at index 0.
    ///
    /// A panicking wave task aborts the reduction; the sequence is then in
    /// an unspecified intermediate state.
    pub fn reduce(&mut self, sequence: &Sequence) -> Result<Reduction> {
        let mut size = sequence.capacity();
        if size == 0 {
            return Err(ReduceError::EmptySequence);
        }

        let mut round = 0;
        while size > 1 {
            round += 1;
            for worker_index in 0..self.total_workers {
                let assignment = WorkerAssignment::new(worker_index, self.total_workers);
                self.pool
                    .add_task(Arc::new(WaveTask::new(sequence.clone(), size, assignment)))?;
            }
            // Round k + 1 reads what round k wrote.
            self.pool.barrier()?;

            let report = RoundReport {
                round,
                size_before: size,
                size_after: next_size(size),
            };
            debug!(
                "round {}: size {} -> {}",
                report.round, report.size_before, report.size_after
            );
            if let Some(observer) = self.observer.as_mut() {
                observer.on_round(&report, sequence);
            }
            size = report.size_after;
        }

        let total = sequence.get(0).ok_or(ReduceError::EmptySequence)?;
        Ok(Reduction {
            total,
            rounds: round,
        })
    }
}
