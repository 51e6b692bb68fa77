//! Logging hooks for the demo run.

use log::debug;

use crate::work::{WorkContext, WorkResults};

pub fn log_worker_start(
    _ctx: &WorkContext,
    worker: usize,
    _work_count: usize,
    _results: &WorkResults,
) {
    debug!("A new Worker ({worker}) started to accept jobs");
}

pub fn log_worker_end(
    _ctx: &WorkContext,
    worker: usize,
    work_count: usize,
    _results: &WorkResults,
) {
    debug!("The Worker ({worker}) ended {work_count} jobs");
}

pub fn log_work_finished(
    _ctx: &WorkContext,
    worker: usize,
    work_count: usize,
    results: &WorkResults,
) {
    debug!(
        "The job ({work_count}) ended from Worker: {worker} [{} done so far]",
        results.total_count()
    );
}
