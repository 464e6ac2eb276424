// SPDX-License-Identifier: MIT

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use log::{trace, warn};

use crate::error::PoolError;

/// Grace period used by each shutdown phase when the pool is dropped.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(60);

/// Trait defining a general task structure, with an execute method to be
/// implemented by each task.
pub trait Task {
    fn execute(&self);
}

/// Lifecycle of the pool as seen by the workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PoolState {
    /// Accepting and running tasks.
    Running,
    /// No new tasks; workers exit once the queue is empty.
    Draining,
    /// Queue discarded; workers exit after their current task.
    Stopping,
}

/// Shared data structure for the job scheduler, holding the task queue and
/// the bookkeeping needed by `barrier` and `shutdown`.
struct SchedulerSharedData {
    /// Queue of tasks for worker threads.
    task_queue: VecDeque<Arc<dyn Task + Send + Sync>>,
    state: PoolState,
    /// Tasks submitted but not yet finished (queued plus running).
    pending: usize,
    /// Panicked tasks since the last barrier.
    failures: usize,
    first_panic: Option<String>,
    /// Worker threads that have not left their loop yet.
    live_workers: usize,
}

impl SchedulerSharedData {
    fn new() -> Self {
        SchedulerSharedData {
            task_queue: VecDeque::with_capacity(128),
            state: PoolState::Running,
            pending: 0,
            failures: 0,
            first_panic: None,
            live_workers: 0,
        }
    }

    /// Drops every queued task, returning how many were discarded.
    fn discard_queue(&mut self) -> usize {
        let discarded = self.task_queue.len();
        self.task_queue.clear();
        self.pending -= discarded;
        discarded
    }
}

/// Fixed-size pool of worker threads fed from a FIFO queue.
///
/// The pool is an ordinary owned value: create it, submit batches of tasks
/// separated by [`barrier`](StandardPool::barrier) calls, then
/// [`shutdown`](StandardPool::shutdown) it (or let `Drop` do so).
pub struct StandardPool {
    /// Pool of worker threads.
    worker_threads: Vec<thread::JoinHandle<()>>,
    /// Shared data protected by a mutex
    shared_data: Arc<Mutex<SchedulerSharedData>>,
    /// Condition variable to notify workers of new tasks or shutdown.
    task_available: Arc<Condvar>,
    /// Signalled when `pending` reaches zero or a worker exits.
    progress: Arc<Condvar>,
}

fn lock_shared(
    shared_data: &Mutex<SchedulerSharedData>,
) -> MutexGuard<'_, SchedulerSharedData> {
    match shared_data.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            shared_data.clear_poison();
            poisoned.into_inner()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn worker_loop(
    worker_id: usize,
    shared_data: Arc<Mutex<SchedulerSharedData>>,
    task_available: Arc<Condvar>,
    progress: Arc<Condvar>,
) {
    trace!("worker {worker_id} started");
    loop {
        let task = {
            let mut shared_data_guard = lock_shared(&shared_data);

            // Wait until there is a task to process or a shutdown signal.
            while shared_data_guard.task_queue.is_empty()
                && shared_data_guard.state == PoolState::Running
            {
                shared_data_guard = task_available
                    .wait(shared_data_guard)
                    .unwrap_or_else(|e| e.into_inner());
            }

            if shared_data_guard.state == PoolState::Stopping {
                break;
            }

            // Empty queue while draining means there is nothing left to do.
            match shared_data_guard.task_queue.pop_front() {
                Some(task) => task,
                None => break,
            }
        };

        // Execute the task outside the lock scope.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| task.execute()));
        drop(task);

        let mut shared_data_guard = lock_shared(&shared_data);
        if let Err(payload) = outcome {
            let message = panic_message(payload.as_ref());
            let discarded = shared_data_guard.discard_queue();
            warn!(
                "worker {worker_id}: task panicked ({message}); \
                 discarded {discarded} queued task(s)"
            );
            shared_data_guard.failures += 1;
            shared_data_guard.first_panic.get_or_insert(message);
        }
        shared_data_guard.pending -= 1;
        if shared_data_guard.pending == 0 {
            progress.notify_all();
        }
    }

    let mut shared_data_guard = lock_shared(&shared_data);
    shared_data_guard.live_workers -= 1;
    progress.notify_all();
    trace!("worker {worker_id} exited");
}

impl StandardPool {
    /// Creates a new pool with the specified number of worker threads.
    pub fn new(thread_count: usize) -> Result<Self, PoolError> {
        if thread_count == 0 {
            return Err(PoolError::NoWorkers);
        }

        let mut pool = StandardPool {
            worker_threads: Vec::with_capacity(thread_count),
            shared_data: Arc::new(Mutex::new(SchedulerSharedData::new())),
            task_available: Arc::new(Condvar::new()),
            progress: Arc::new(Condvar::new()),
        };

        // Spawn worker threads that wait for tasks to be added to the task
        // queue. On failure the partly built pool is torn down by `Drop`.
        for worker_id in 0..thread_count {
            let shared_data = pool.shared_data.clone();
            let task_available = pool.task_available.clone();
            let progress = pool.progress.clone();

            lock_shared(&pool.shared_data).live_workers += 1;
            let spawned = thread::Builder::new()
                .name(format!("pool-worker-{worker_id}"))
                .spawn(move || {
                    worker_loop(worker_id, shared_data, task_available, progress)
                });

            match spawned {
                Ok(handle) => pool.worker_threads.push(handle),
                Err(err) => {
                    lock_shared(&pool.shared_data).live_workers -= 1;
                    return Err(PoolError::Spawn(err));
                }
            }
        }

        Ok(pool)
    }

    /// Number of worker threads owned by the pool.
    pub fn thread_count(&self) -> usize {
        self.worker_threads.len()
    }

    /// Adds a task to the scheduler's task queue and notifies one waiting
    /// worker thread.
    pub fn add_task(
        &self,
        task: Arc<dyn Task + Send + Sync>,
    ) -> Result<(), PoolError> {
        let mut shared_data_guard = lock_shared(&self.shared_data);
        if shared_data_guard.state != PoolState::Running {
            return Err(PoolError::ShutDown);
        }
        shared_data_guard.task_queue.push_back(task);
        shared_data_guard.pending += 1;
        self.task_available.notify_one();
        Ok(())
    }

    /// Blocks until every task submitted so far has finished.
    ///
    /// Reports the panics recorded since the previous barrier; the batch in
    /// which a task panicked is aborted, so some of its tasks may never have
    /// run. Must not be called from inside a task.
    pub fn barrier(&self) -> Result<(), PoolError> {
        let mut shared_data_guard = lock_shared(&self.shared_data);
        while shared_data_guard.pending > 0 && shared_data_guard.live_workers > 0
        {
            shared_data_guard = self
                .progress
                .wait(shared_data_guard)
                .unwrap_or_else(|e| e.into_inner());
        }

        if shared_data_guard.failures > 0 {
            let failed = std::mem::take(&mut shared_data_guard.failures);
            let message = shared_data_guard
                .first_panic
                .take()
                .unwrap_or_default();
            return Err(PoolError::TaskPanicked { failed, message });
        }

        if shared_data_guard.pending > 0 {
            return Err(PoolError::ShutDown);
        }
        Ok(())
    }

    /// Stops the pool.
    ///
    /// Workers first finish the queued tasks; if they have not exited
    /// within `grace`, the queue is discarded and they are told to exit
    /// after their current task, with another `grace` to comply. Workers
    /// still running after that are detached and reported.
    pub fn shutdown(&mut self, grace: Duration) -> Result<(), PoolError> {
        if self.worker_threads.is_empty() {
            return Ok(());
        }

        {
            let mut shared_data_guard = lock_shared(&self.shared_data);
            if shared_data_guard.state == PoolState::Running {
                shared_data_guard.state = PoolState::Draining;
            }
            self.task_available.notify_all();
        }

        if !self.wait_for_exit(grace) {
            warn!("workers still busy after {grace:?}; forcing shutdown");
            let mut shared_data_guard = lock_shared(&self.shared_data);
            shared_data_guard.state = PoolState::Stopping;
            let discarded = shared_data_guard.discard_queue();
            if discarded > 0 {
                warn!("discarded {discarded} queued task(s)");
            }
            self.task_available.notify_all();
            self.progress.notify_all();
        }

        if !self.wait_for_exit(grace) {
            let remaining = lock_shared(&self.shared_data).live_workers;
            // Detach the stragglers; they exit on their own once their
            // current task returns.
            self.worker_threads.clear();
            return Err(PoolError::ShutdownTimedOut { remaining });
        }

        for handle in self.worker_threads.drain(..) {
            let _ = handle.join();
        }
        Ok(())
    }

    /// Waits up to `grace` for every worker to leave its loop.
    fn wait_for_exit(&self, grace: Duration) -> bool {
        let deadline = Instant::now() + grace;
        let mut shared_data_guard = lock_shared(&self.shared_data);
        while shared_data_guard.live_workers > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            shared_data_guard = self
                .progress
                .wait_timeout(shared_data_guard, deadline - now)
                .unwrap_or_else(|e| e.into_inner())
                .0;
        }
        true
    }
}

impl Drop for StandardPool {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown(DEFAULT_SHUTDOWN_GRACE) {
            warn!("thread pool shutdown incomplete: {err}");
        }
    }
}
