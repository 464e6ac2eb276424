// SPDX-License-Identifier: MIT

//! Error types for the worker pool and the round coordinator.

use thiserror::Error;

/// Failures reported by [`StandardPool`](crate::pools::standardpool::StandardPool).
#[derive(Error, Debug)]
pub enum PoolError {
    /// A pool needs at least one worker thread to make progress.
    #[error("thread pool requires at least one worker thread")]
    NoWorkers,

    /// The operating system refused to spawn a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// A task was submitted after shutdown had started.
    #[error("thread pool is shut down")]
    ShutDown,

    /// One or more tasks panicked since the last barrier. Queued tasks of
    /// the same batch were discarded.
    #[error("{failed} task(s) panicked; first panic: {message}")]
    TaskPanicked { failed: usize, message: String },

    /// Workers were still alive after both the graceful and the forced
    /// shutdown phases.
    #[error("{remaining} worker thread(s) did not terminate")]
    ShutdownTimedOut { remaining: usize },
}

/// Failures reported by [`RoundCoordinator`](crate::coordinator::RoundCoordinator).
#[derive(Error, Debug)]
pub enum ReduceError {
    #[error("worker count must be positive")]
    InvalidWorkerCount,

    #[error("cannot reduce an empty sequence")]
    EmptySequence,

    /// A round could not complete. No partial result is valid.
    #[error("reduction aborted: {0}")]
    Pool(#[from] PoolError),

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl ReduceError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReduceError>;
