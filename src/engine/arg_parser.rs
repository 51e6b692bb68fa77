use clap::Parser;
use std::path::PathBuf;

/// Run the demo work engine: a counting repository feeds a pool of sleeping workers.
#[derive(Clone, Debug, Default, Parser)]
#[command(name = "noise-worker")]
#[command(about = "Fetch items, fan them out to a fixed worker pool, print what happened.")]
pub struct Cli {
    /// Config file. Default: `.noise-worker.toml` in the current directory, if present.
    #[arg(long, short = 'C', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of items the repository generates.
    #[arg(long, short = 'n')]
    pub items: Option<usize>,

    /// Channel capacity between the repository and the workers.
    #[arg(long, short = 'b')]
    pub buffer_size: Option<usize>,

    /// Number of worker threads.
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// Number of sleep steps a job draws from (0..N). 0 disables sleeping.
    #[arg(long)]
    pub max_steps: Option<u32>,

    /// Length of one sleep step in milliseconds.
    #[arg(long)]
    pub step_ms: Option<u64>,

    /// Seed for the job's random source (reproducible sleeps).
    #[arg(long, short = 's')]
    pub seed: Option<u64>,

    /// Fail every N-th item to exercise error reporting. 0 disables.
    #[arg(long)]
    pub fail_every: Option<usize>,

    /// Cancel the run after this many milliseconds.
    #[arg(long, short = 't')]
    pub timeout_ms: Option<u64>,

    /// Verbose output (debug logs from workers).
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Show a progress bar.
    #[arg(long, short = 'p', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub progress: Option<bool>,

    /// Print the summary as JSON.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub json: Option<bool>,
}
