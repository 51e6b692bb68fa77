//! The work engine: one producer on the calling thread, a fixed pool of workers, one bounded
//! channel between them.

use anyhow::{Result, ensure};
use crossbeam_channel::bounded;
use log::{debug, warn};
use std::thread;

use super::delegates::{FetchWork, ProcessItem, WorkHooks};
use super::{FetchedCounter, WorkContext, WorkResults, WorkSender};
use crate::WorkError;

/// Channel capacity and worker count. Both fixed for the lifetime of an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    buffer_size: usize,
    workers: usize,
}

impl EngineConfig {
    pub fn new(buffer_size: usize, workers: usize) -> Result<Self> {
        ensure!(buffer_size > 0, "buffer size must be positive, got {buffer_size}");
        ensure!(workers > 0, "worker count must be positive, got {workers}");
        Ok(Self {
            buffer_size,
            workers,
        })
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

/// Runs a producer against a pool of workers and collects what happened.
///
/// Stateless across runs: every [`start`](Self::start) gets a fresh channel and a fresh
/// [`WorkResults`].
pub struct WorkEngine<'a, T> {
    config: EngineConfig,
    producer: FetchWork<'a, T>,
    pub(super) processor: ProcessItem<'a, T>,
    pub(super) hooks: WorkHooks<'a>,
}

impl<'a, T: Send> WorkEngine<'a, T> {
    /// Engine with no-op lifecycle hooks.
    pub fn new<F, P>(config: EngineConfig, producer: F, processor: P) -> Self
    where
        F: Fn(&WorkContext, &FetchedCounter<'_>, &WorkSender<'_, T>) -> Result<()>
            + Send
            + Sync
            + 'a,
        P: Fn(&WorkContext, T) -> Result<()> + Send + Sync + 'a,
    {
        Self {
            config,
            producer: Box::new(producer),
            processor: Box::new(processor),
            hooks: WorkHooks::default(),
        }
    }

    /// Replace all three hooks at once.
    pub fn with_hooks(mut self, hooks: WorkHooks<'a>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn on_worker_start<H>(mut self, hook: H) -> Self
    where
        H: Fn(&WorkContext, usize, usize, &WorkResults) + Send + Sync + 'a,
    {
        self.hooks.worker_start = Box::new(hook);
        self
    }

    pub fn on_worker_end<H>(mut self, hook: H) -> Self
    where
        H: Fn(&WorkContext, usize, usize, &WorkResults) + Send + Sync + 'a,
    {
        self.hooks.worker_end = Box::new(hook);
        self
    }

    pub fn on_work_finished<H>(mut self, hook: H) -> Self
    where
        H: Fn(&WorkContext, usize, usize, &WorkResults) + Send + Sync + 'a,
    {
        self.hooks.work_finished = Box::new(hook);
        self
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Run once: spawn the workers, run the producer here, close the channel, join.
    ///
    /// Never fails. A producer error and every item error end up in the returned
    /// [`WorkResults`]; check [`has_error`](WorkResults::has_error) afterwards. Returns only
    /// after every worker thread has exited. Cancelling `ctx` makes workers stop at their next
    /// receive, abandoning whatever is still queued; the producer is expected to notice the
    /// same signal (its sends fail once `ctx` is done).
    pub fn start(&self, ctx: &WorkContext) -> WorkResults {
        let results = WorkResults::new();
        let (tx, rx) = bounded::<T>(self.config.buffer_size);
        debug!(
            "starting {} workers, channel capacity {}",
            self.config.workers, self.config.buffer_size
        );

        thread::scope(|s| {
            for worker in 0..self.config.workers {
                let rx = rx.clone();
                let results = &results;
                s.spawn(move || self.run_worker(ctx, worker, rx, results));
            }
            // Only workers hold receivers, so sends fail instead of blocking once they are gone.
            drop(rx);

            let sender = WorkSender::new(tx, ctx);
            if let Err(err) = (self.producer)(ctx, &FetchedCounter::new(&results), &sender) {
                warn!("producer failed: {err:#}");
                results.append_error(WorkError::fetch(err));
            }
            // Dropping the last sender closes the channel so workers exit.
            drop(sender);
            debug!(
                "producer done after {} items; waiting for workers",
                results.fetched_count()
            );
        });

        debug!(
            "all workers joined: total {}, successful {}, errors {}",
            results.total_count(),
            results.successful_count(),
            results.error_count()
        );
        results
    }
}
