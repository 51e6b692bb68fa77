//! Thread-safe aggregation of counts and errors for one engine run.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::WorkError;

#[derive(Default)]
struct ResultsState {
    fetched: usize,
    total: usize,
    successful: usize,
    errors: Vec<Arc<WorkError>>,
}

/// Counts and errors written concurrently by the producer and every worker.
///
/// Each mutation is its own critical section; no transaction spans two fields, so `total`
/// and `successful` are only consistent with each other once the run has returned.
pub struct WorkResults {
    state: RwLock<ResultsState>,
}

impl WorkResults {
    pub(crate) fn new() -> Self {
        Self {
            state: RwLock::new(ResultsState::default()),
        }
    }

    // Every critical section touches a single field, so a poisoned lock still holds
    // consistent data.
    fn read(&self) -> RwLockReadGuard<'_, ResultsState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ResultsState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Items the producer reported as fetched.
    pub fn fetched_count(&self) -> usize {
        self.read().fetched
    }

    /// Items dequeued and processed, failed or not.
    pub fn total_count(&self) -> usize {
        self.read().total
    }

    /// Items whose processor returned `Ok`.
    pub fn successful_count(&self) -> usize {
        self.read().successful
    }

    /// Snapshot of every recorded error, in the order they were appended.
    pub fn all_errors(&self) -> Vec<Arc<WorkError>> {
        self.read().errors.clone()
    }

    pub fn error_count(&self) -> usize {
        self.read().errors.len()
    }

    pub fn has_error(&self) -> bool {
        self.error_count() > 0
    }

    /// First recorded error, if any.
    pub fn first_error(&self) -> Option<Arc<WorkError>> {
        self.read().errors.first().cloned()
    }

    pub(crate) fn increment_fetched(&self) {
        self.write().fetched += 1;
    }

    pub(crate) fn increment_total(&self) {
        self.write().total += 1;
    }

    pub(crate) fn increment_successful(&self) {
        self.write().successful += 1;
    }

    pub(crate) fn append_error(&self, err: WorkError) {
        self.write().errors.push(Arc::new(err));
    }
}

impl std::fmt::Debug for WorkResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("WorkResults")
            .field("fetched", &state.fetched)
            .field("total", &state.total)
            .field("successful", &state.successful)
            .field("errors", &state.errors.len())
            .finish()
    }
}

/// Handle the producer uses to report each item it pushes. Wraps the run's results so the
/// count is visible to every reader as soon as it is written.
#[derive(Clone, Copy)]
pub struct FetchedCounter<'r> {
    results: &'r WorkResults,
}

impl<'r> FetchedCounter<'r> {
    pub(crate) fn new(results: &'r WorkResults) -> Self {
        Self { results }
    }

    /// Count one fetched item. Call once per pushed item, in push order.
    pub fn increment(&self) {
        self.results.increment_fetched();
    }

    pub fn get(&self) -> usize {
        self.results.fetched_count()
    }
}
