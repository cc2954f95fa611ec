//! Where pipeline work runs
//!
//! The pipeline never spawns anything itself. It hands lex jobs to a
//! "worker" executor and apply callbacks to an "apply" executor, so the
//! embedder decides which threads are involved.

use std::collections::VecDeque;

use parking_lot::Mutex;

/// A unit of work
pub type Job = Box<dyn FnOnce() + Send + 'static>;

pub trait Executor: Send + Sync {
    fn execute(&self, job: Job);

    /// True when `execute` runs the job before returning. Nothing can
    /// supersede such a job while it runs, so the pipeline never debounces it.
    fn runs_inline(&self) -> bool {
        false
    }
}

/// Runs each job immediately on the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, job: Job) {
        job();
    }

    fn runs_inline(&self) -> bool {
        true
    }
}

/// Runs each job on a fresh, named OS thread
#[derive(Debug, Clone)]
pub struct ThreadExecutor {
    name: String,
}

impl ThreadExecutor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for ThreadExecutor {
    fn default() -> Self {
        Self::new("textcore-lex")
    }
}

impl Executor for ThreadExecutor {
    fn execute(&self, job: Job) {
        let spawned = std::thread::Builder::new()
            .name(self.name.clone())
            .spawn(job);
        if let Err(e) = spawned {
            tracing::error!("Failed to spawn {} thread: {}", self.name, e);
        }
    }
}

/// Holds jobs until the owner drains them with [`run_pending`](Self::run_pending).
///
/// Models an event-loop thread: jobs submitted from anywhere run wherever
/// `run_pending` is called.
#[derive(Default)]
pub struct QueuedExecutor {
    queue: Mutex<VecDeque<Job>>,
}

impl QueuedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs waiting
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Run queued jobs, including any queued while draining, and return how
    /// many ran
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            // Release the lock before running so jobs may enqueue more work
            let Some(job) = self.queue.lock().pop_front() else {
                return ran;
            };
            job();
            ran += 1;
        }
    }
}

impl Executor for QueuedExecutor {
    fn execute(&self, job: Job) {
        self.queue.lock().push_back(job);
    }
}

impl std::fmt::Debug for QueuedExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedExecutor")
            .field("pending", &self.pending())
            .finish()
    }
}
