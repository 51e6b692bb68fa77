//! Shapes of the functions the engine calls: producer, item processor, lifecycle hooks.

use super::{FetchedCounter, WorkContext, WorkResults, WorkSender};

/// Producer: push items through the sender, count each one, return once done.
/// Called exactly once per run, on the thread that called `start`.
pub type FetchWork<'a, T> = Box<
    dyn Fn(&WorkContext, &FetchedCounter<'_>, &WorkSender<'_, T>) -> anyhow::Result<()>
        + Send
        + Sync
        + 'a,
>;

/// Item processor: called once per dequeued item by whichever worker took it.
pub type ProcessItem<'a, T> =
    Box<dyn Fn(&WorkContext, T) -> anyhow::Result<()> + Send + Sync + 'a>;

/// Lifecycle hook: `(ctx, worker index, worker-local work count, results)`.
/// Side effects only. Runs on the worker's thread, so a slow hook stalls that worker.
pub type WorkLogger<'a> =
    Box<dyn Fn(&WorkContext, usize, usize, &WorkResults) + Send + Sync + 'a>;

/// The hook installed when none is given.
pub fn empty_work_logger<'a>() -> WorkLogger<'a> {
    Box::new(|_ctx, _worker, _work_count, _results| {})
}

/// The three hooks a run invokes.
pub struct WorkHooks<'a> {
    /// Once per worker before its first receive; `work_count` is 0.
    pub worker_start: WorkLogger<'a>,
    /// Once per worker on exit, whichever way it exits.
    pub worker_end: WorkLogger<'a>,
    /// After each item, before the total/successful counters are bumped.
    pub work_finished: WorkLogger<'a>,
}

impl Default for WorkHooks<'_> {
    fn default() -> Self {
        Self {
            worker_start: empty_work_logger(),
            worker_end: empty_work_logger(),
            work_finished: empty_work_logger(),
        }
    }
}
