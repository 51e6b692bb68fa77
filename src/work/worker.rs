//! Per-worker loop: wait for an item or cancellation, process, record, repeat.

use crossbeam_channel::{Receiver, select};
use log::{debug, trace};

use super::delegates::WorkLogger;
use super::{WorkContext, WorkEngine, WorkResults};
use crate::WorkError;

enum Next<T> {
    Item(T),
    Closed,
    Cancelled,
}

/// Runs the worker-end hook when dropped, so it fires once on every exit path (including a
/// panicking processor).
struct WorkerExit<'w, 'a> {
    hook: &'w WorkLogger<'a>,
    ctx: &'w WorkContext,
    worker: usize,
    work_count: usize,
    results: &'w WorkResults,
}

impl Drop for WorkerExit<'_, '_> {
    fn drop(&mut self) {
        (self.hook)(self.ctx, self.worker, self.work_count, self.results);
    }
}

impl<T: Send> WorkEngine<'_, T> {
    pub(super) fn run_worker(
        &self,
        ctx: &WorkContext,
        worker: usize,
        items: Receiver<T>,
        results: &WorkResults,
    ) {
        (self.hooks.worker_start)(ctx, worker, 0, results);
        let mut exit = WorkerExit {
            hook: &self.hooks.worker_end,
            ctx,
            worker,
            work_count: 0,
            results,
        };

        loop {
            // Either arm may win when both are ready.
            let next = select! {
                recv(items) -> msg => match msg {
                    Ok(item) => Next::Item(item),
                    Err(_) => Next::Closed,
                },
                recv(ctx.done()) -> _ => Next::Cancelled,
            };
            match next {
                Next::Item(item) => {
                    exit.work_count += 1;
                    self.process_one(ctx, worker, exit.work_count, item, results);
                }
                Next::Closed => {
                    trace!("worker {worker}: channel closed after {} items", exit.work_count);
                    return;
                }
                Next::Cancelled => {
                    debug!("worker {worker}: cancelled after {} items", exit.work_count);
                    return;
                }
            }
        }
    }

    fn process_one(
        &self,
        ctx: &WorkContext,
        worker: usize,
        work_count: usize,
        item: T,
        results: &WorkResults,
    ) {
        let succeeded = match (self.processor)(ctx, item) {
            Ok(()) => true,
            Err(err) => {
                debug!("worker {worker}: item {work_count} failed: {err:#}");
                results.append_error(WorkError::item(worker, work_count, err));
                false
            }
        };
        (self.hooks.work_finished)(ctx, worker, work_count, results);
        if succeeded {
            results.increment_successful();
        }
        results.increment_total();
    }
}
