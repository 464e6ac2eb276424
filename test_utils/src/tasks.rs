// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicUsize, Ordering::SeqCst};
use std::sync::Arc;
use halving_reduce::Task;

/// Task that increments a shared counter.
pub struct CountingTask {
    counter: Arc<AtomicUsize>,
}

impl CountingTask {
    pub fn new(counter: Arc<AtomicUsize>) -> Self {
        CountingTask { counter }
    }
}

impl Task for CountingTask {
    fn execute(&self) {
        self.counter.fetch_add(1, SeqCst);
    }
}

/// Task that always panics with the given message.
pub struct PanickingTask {
    message: &'static str,
}

impl PanickingTask {
    pub fn new(message: &'static str) -> Self {
        PanickingTask { message }
    }
}

impl Task for PanickingTask {
    fn execute(&self) {
        panic!("{}", self.message);
    }
}
