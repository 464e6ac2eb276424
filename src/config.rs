// SPDX-License-Identifier: MIT

use std::thread;
use std::time::Duration;

use crate::error::{ReduceError, Result};
use crate::pools::standardpool::DEFAULT_SHUTDOWN_GRACE;

/// Parameters of a reduction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceConfig {
    /// Length of the generated `1..=elements` sequence.
    pub elements: usize,
    /// Wave tasks per round.
    pub workers: usize,
    /// Pool threads.
    pub threads: usize,
    /// Grace period of each shutdown phase.
    pub shutdown_grace: Duration,
    /// Print the full sequence after every round.
    pub print_rounds: bool,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        ReduceConfig {
            elements: 1000,
            workers: 5,
            threads: thread::available_parallelism().map_or(1, |n| n.get()),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            print_rounds: true,
        }
    }
}

impl ReduceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.elements == 0 {
            return Err(ReduceError::config("elements must be at least 1"));
        }
        if self.workers == 0 {
            return Err(ReduceError::config("workers must be at least 1"));
        }
        if self.threads == 0 {
            return Err(ReduceError::config("threads must be at least 1"));
        }
        Ok(())
    }
}
