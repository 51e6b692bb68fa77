//! CLI command handler: resolve options, run the demo, print the summary.

use anyhow::{Context, Result, bail};
use kdam::Animation;
use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::arg_parser::Cli;
use crate::engine::progress::{ProgressBarConfig, create_progress_bar};
use crate::example::{DomainService, Repository, UseCase, fail_on_first_error};
use crate::utils::config::PackagePaths;
use crate::utils::noise_toml::{apply_file_to_opts, load_noise_toml};
use crate::utils::setup_logging;
use crate::work::WorkContext;
use crate::{Opts, RunSummary};

/// Overwrite opts field from the CLI when the flag was given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $cli_field:ident => $opts_field:ident) => {
        if let Some(v) = $cli.$cli_field {
            $opts.$opts_field = v;
        }
    };
}

/// Defaults, then the config file, then CLI flags.
pub fn build_opts(cli: &Cli) -> Result<Opts> {
    let mut opts = Opts {
        config_path: cli.config.clone(),
        ..Opts::default()
    };

    let path = opts
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(PackagePaths::get().config_filename()));
    match load_noise_toml(&path)? {
        Some(file) => apply_file_to_opts(&file, &mut opts),
        None if opts.config_path.is_some() => bail!("config file {} not found", path.display()),
        None => {}
    }

    apply_cli_opt!(cli, opts, items => items);
    apply_cli_opt!(cli, opts, buffer_size => buffer_size);
    apply_cli_opt!(cli, opts, workers => workers);
    apply_cli_opt!(cli, opts, max_steps => max_steps);
    if let Some(ms) = cli.step_ms {
        opts.step = Duration::from_millis(ms);
    }
    if cli.seed.is_some() {
        opts.seed = cli.seed;
    }
    apply_cli_opt!(cli, opts, fail_every => fail_every);
    if let Some(ms) = cli.timeout_ms {
        opts.timeout = Some(Duration::from_millis(ms));
    }
    apply_cli_opt!(cli, opts, verbose => verbose);
    apply_cli_opt!(cli, opts, progress => progress);
    apply_cli_opt!(cli, opts, json => json);
    Ok(opts)
}

fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}

/// Run the demo once and print the summary. Fails afterwards with the first recorded error,
/// or when Ctrl+C (or `--timeout-ms`) cancelled the run.
pub fn handle_run(cli: &Cli) -> Result<RunSummary> {
    let opts = build_opts(cli)?;
    setup_logging(opts.verbose);
    debug!(
        "{} CONFIG:{:#?}",
        PackagePaths::get().pkg_name().to_uppercase(),
        opts
    );

    let (ctx, cancel) = match opts.timeout {
        Some(timeout) => WorkContext::with_timeout(timeout),
        None => WorkContext::with_cancel(),
    };
    let handler = cancel.clone();
    ctrlc::set_handler(move || handler.cancel()).context("set Ctrl+C handler")?;

    let rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let service = DomainService::new(rng)
        .with_sleep(opts.max_steps, opts.step)
        .with_fail_every(opts.fail_every);
    let bar = opts.progress.then(|| {
        create_progress_bar(ProgressBarConfig::new(
            opts.items,
            "Working",
            Animation::Classic,
        ))
    });
    let use_case = UseCase::new(
        Repository::new(opts.items),
        service,
        opts.buffer_size,
        opts.workers,
    )
    .with_progress(bar);

    let results = use_case.execute(&ctx)?;
    let summary = RunSummary::from_results(&results, ctx.is_cancelled());
    print_summary(&summary, opts.json)?;

    fail_on_first_error(&results)?;
    if summary.cancelled {
        warn!("RUN CANCELLED. QUEUED ITEMS WERE ABANDONED.");
        bail!(
            "run cancelled after {} of {} fetched items",
            summary.total_work_count,
            summary.fetched_work_count
        );
    }
    Ok(summary)
}
