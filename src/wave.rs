// SPDX-License-Identifier: MIT

//! One worker's share of a round.

use crate::pools::standardpool::Task;
use crate::sequence::Sequence;

/// Leapfrog assignment: worker `worker_index` of `total_workers` visits
/// `worker_index, worker_index + total_workers, ...` every round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerAssignment {
    pub worker_index: usize,
    pub total_workers: usize,
}

impl WorkerAssignment {
    pub fn new(worker_index: usize, total_workers: usize) -> Self {
        debug_assert!(worker_index < total_workers);
        WorkerAssignment {
            worker_index,
            total_workers,
        }
    }

    /// Indices this worker writes in a round of logical size `size`.
    ///
    /// Empty when `worker_index >= size / 2`. The middle element of an odd
    /// size is never visited.
    pub fn indices(&self, size: usize) -> impl Iterator<Item = usize> {
        (self.worker_index..size / 2).step_by(self.total_workers.max(1))
    }
}

/// Folds `sequence[size - 1 - i]` into `sequence[i]` for every index of
/// `assignment` below `size / 2`.
pub fn run_wave(sequence: &Sequence, size: usize, assignment: WorkerAssignment) {
    debug_assert!(size <= sequence.capacity());
    for i in assignment.indices(size) {
        sequence.fold_mirror(i, size - 1 - i);
    }
}

/// Write sets of every worker for one round, indexed by worker.
pub fn round_writes(size: usize, total_workers: usize) -> Vec<Vec<usize>> {
    (0..total_workers)
        .map(|w| WorkerAssignment::new(w, total_workers).indices(size).collect())
        .collect()
}

/// Pool task running one worker's wave for one round.
pub struct WaveTask {
    sequence: Sequence,
    size: usize,
    assignment: WorkerAssignment,
}

impl WaveTask {
    pub fn new(sequence: Sequence, size: usize, assignment: WorkerAssignment) -> Self {
        WaveTask {
            sequence,
            size,
            assignment,
        }
    }
}

impl Task for WaveTask {
    fn execute(&self) {
        run_wave(&self.sequence, self.size, self.assignment);
    }
}
