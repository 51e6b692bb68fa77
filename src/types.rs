//! Public and internal types for the noise-worker API and demo run.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::work::WorkResults;

/// Where a recorded error came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorOrigin {
    /// The producer returned an error. Recorded at most once per run.
    Fetch,
    /// The item processor failed. `work_count` is the worker-local item number (1-based).
    Item { worker: usize, work_count: usize },
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorOrigin::Fetch => write!(f, "fetch"),
            ErrorOrigin::Item { worker, work_count } => {
                write!(f, "worker {worker} item {work_count}")
            }
        }
    }
}

/// An error captured during a run, tagged with its origin.
#[derive(Debug)]
pub struct WorkError {
    pub origin: ErrorOrigin,
    pub source: anyhow::Error,
}

impl fmt::Display for WorkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:#}", self.origin, self.source)
    }
}

impl std::error::Error for WorkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl WorkError {
    pub fn fetch(source: anyhow::Error) -> Self {
        Self {
            origin: ErrorOrigin::Fetch,
            source,
        }
    }

    pub fn item(worker: usize, work_count: usize, source: anyhow::Error) -> Self {
        Self {
            origin: ErrorOrigin::Item { worker, work_count },
            source,
        }
    }

    pub fn is_fetch(&self) -> bool {
        self.origin == ErrorOrigin::Fetch
    }
}

/// Final counts of a run, as printed by the CLI (boxed text or JSON).
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    pub fetched_work_count: usize,
    pub total_work_count: usize,
    pub successful_work_count: usize,
    pub error_count: usize,
    pub cancelled: bool,
}

impl RunSummary {
    /// Snapshot the readers of `results`. `cancelled` comes from the run's context.
    pub fn from_results(results: &WorkResults, cancelled: bool) -> Self {
        Self {
            fetched_work_count: results.fetched_count(),
            total_work_count: results.total_count(),
            successful_work_count: results.successful_count(),
            error_count: results.error_count(),
            cancelled,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "*************************")?;
        writeln!(f, "*   The Job is finished")?;
        writeln!(f, "* -----------------------")?;
        writeln!(f, "* FetchedWorkCount:    {}", self.fetched_work_count)?;
        writeln!(f, "* TotalWorkCount:      {}", self.total_work_count)?;
        writeln!(f, "* SuccessfulWorkCount: {}", self.successful_work_count)?;
        writeln!(f, "* Errors:              {}", self.error_count)?;
        if self.cancelled {
            writeln!(f, "* (cancelled)")?;
        }
        write!(f, "*************************")
    }
}

/// Full options for a demo run (defaults, then `.noise-worker.toml`, then CLI).
#[derive(Clone, Debug)]
pub struct Opts {
    /// Config file path. When None, `.noise-worker.toml` in the current directory is tried.
    pub config_path: Option<PathBuf>,
    /// Number of items the repository generates.
    pub items: usize,
    /// Channel capacity.
    pub buffer_size: usize,
    /// Worker thread count.
    pub workers: usize,
    /// Upper bound (exclusive) on sleep steps per job.
    pub max_steps: u32,
    /// Duration of one sleep step.
    pub step: Duration,
    /// Seed for the job's random source. When None, seeded from entropy.
    pub seed: Option<u64>,
    /// Fail every n-th item id (0 disables). Demo-only failure injection.
    pub fail_every: usize,
    /// Cancel the run after this long. None means no deadline.
    pub timeout: Option<Duration>,
    /// Debug logging plus per-item logs.
    pub verbose: bool,
    /// Show a progress bar driven by the item-done hook.
    pub progress: bool,
    /// Print the summary as JSON instead of the boxed text.
    pub json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        use crate::utils::config::RunDefaults;
        Self {
            config_path: None,
            items: RunDefaults::ITEMS_TO_FETCH,
            buffer_size: RunDefaults::BUFFER_SIZE,
            workers: RunDefaults::WORKERS,
            max_steps: RunDefaults::MAX_SLEEP_STEPS,
            step: Duration::from_millis(RunDefaults::SLEEP_STEP_MS),
            seed: None,
            fail_every: 0,
            timeout: None,
            verbose: false,
            progress: false,
            json: false,
        }
    }
}
