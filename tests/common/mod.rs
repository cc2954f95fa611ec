//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use textcore::model::Document;
use textcore::syntax::{Executors, QueuedExecutor, TokenMap};

/// Deterministic pseudo-random numbers so failures reproduce
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    /// Uniform in `0..bound` (`bound` > 0)
    pub fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

const FRAGMENTS: &[&str] = &[
    "a", "xyz", "\n", "\r\n", "é", "🦀", "/*", "*/", " ", "line\nbreak",
];

/// Apply one random insert, delete or replace to `doc`
pub fn random_edit(doc: &mut Document, rng: &mut Lcg) {
    let len = doc.len_chars();
    let a = rng.below(len + 1);
    let b = rng.below(len + 1);
    let (start, end) = (a.min(b), a.max(b));
    let fragment = *rng.pick(FRAGMENTS);

    match rng.below(3) {
        0 => doc.insert(start, fragment).unwrap(),
        1 => doc.delete(start, end).unwrap(),
        _ => doc.replace(start, end, fragment).unwrap(),
    }
}

/// Every line of `doc`, in order
pub fn lines(doc: &Document) -> Vec<String> {
    (0..doc.line_count()).map(|i| doc.line(i).unwrap()).collect()
}

/// Line texts of a token map
pub fn map_lines(map: &TokenMap) -> Vec<&str> {
    map.lines.iter().map(|l| l.text.as_str()).collect()
}

/// Worker and apply queues drained by hand
pub struct ManualExecutors {
    pub worker: Arc<QueuedExecutor>,
    pub apply: Arc<QueuedExecutor>,
}

impl ManualExecutors {
    pub fn new() -> Self {
        Self {
            worker: Arc::new(QueuedExecutor::new()),
            apply: Arc::new(QueuedExecutor::new()),
        }
    }

    pub fn executors(&self) -> Executors {
        Executors::new(self.worker.clone(), self.apply.clone())
    }

    /// Run all queued lex jobs, then all queued applies
    pub fn drain(&self) {
        self.worker.run_pending();
        self.apply.run_pending();
    }
}

pub type Applied = Arc<Mutex<Vec<Arc<TokenMap>>>>;

/// Apply callback that records every map it receives
pub fn recorder() -> (Applied, impl FnMut(Arc<TokenMap>) + Send + 'static) {
    let applied: Applied = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&applied);
    (applied, move |map| sink.lock().push(map))
}
