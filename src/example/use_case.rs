//! Wires the demo repository and service into a work engine and reports the outcome.

use anyhow::{Result, anyhow};
use log::{info, warn};

use super::hooks::{log_work_finished, log_worker_end, log_worker_start};
use super::{DomainService, Model, Repository};
use crate::RunSummary;
use crate::engine::progress::{ProgressBar, finish_progress_bar, update_progress_bar};
use crate::work::{EngineConfig, WorkContext, WorkEngine, WorkResults};

pub struct UseCase {
    repository: Repository,
    service: DomainService,
    worker_buffer_size: usize,
    work_concurrency: usize,
    progress: Option<ProgressBar>,
}

impl UseCase {
    pub fn new(
        repository: Repository,
        service: DomainService,
        worker_buffer_size: usize,
        work_concurrency: usize,
    ) -> Self {
        Self {
            repository,
            service,
            worker_buffer_size,
            work_concurrency,
            progress: None,
        }
    }

    /// Tick `bar` once per finished item.
    pub fn with_progress(mut self, bar: Option<ProgressBar>) -> Self {
        self.progress = bar;
        self
    }

    /// Run the engine once and hand back the raw results.
    pub fn execute(&self, ctx: &WorkContext) -> Result<WorkResults> {
        let config = EngineConfig::new(self.worker_buffer_size, self.work_concurrency)?;
        let progress = self.progress.as_ref();

        let engine = WorkEngine::<Model>::new(
            config,
            |ctx, fetched, tx| self.repository.fetch_data(ctx, fetched, tx),
            |ctx, item| self.service.a_very_important_job(ctx, item),
        )
        .on_worker_start(log_worker_start)
        .on_worker_end(log_worker_end)
        .on_work_finished(move |ctx, worker, work_count, results| {
            log_work_finished(ctx, worker, work_count, results);
            if let Some(bar) = progress {
                update_progress_bar(bar, 1);
            }
        });

        let results = engine.start(ctx);
        if let Some(bar) = progress {
            finish_progress_bar(bar, results.total_count());
        }
        Ok(results)
    }

    /// Run the engine once. Returns the summary, or the first recorded error when any item
    /// (or the repository) failed.
    pub fn do_the_job(&self, ctx: &WorkContext) -> Result<RunSummary> {
        let results = self.execute(ctx)?;
        let summary = RunSummary::from_results(&results, ctx.is_cancelled());

        fail_on_first_error(&results)?;
        info!(
            "processed {} of {} fetched items",
            summary.successful_work_count, summary.fetched_work_count
        );
        Ok(summary)
    }
}

/// `Err` carrying the first recorded error when the run recorded any.
pub fn fail_on_first_error(results: &WorkResults) -> Result<()> {
    match results.first_error() {
        Some(first) => {
            warn!(
                "{} of {} jobs failed",
                results.error_count(),
                results.total_count()
            );
            Err(anyhow!("{first}"))
        }
        None => Ok(()),
    }
}
