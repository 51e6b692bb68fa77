//! Load `.noise-worker.toml` (CLI only). Library callers configure the engine directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::Opts;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NoiseWorkerToml {
    #[serde(default)]
    settings: RunSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RunSection {
    items: Option<usize>,
    buffer_size: Option<usize>,
    workers: Option<usize>,
    max_steps: Option<u32>,
    step_ms: Option<u64>,
    seed: Option<u64>,
    fail_every: Option<usize>,
    timeout_ms: Option<u64>,
    verbose: Option<bool>,
    progress: Option<bool>,
    json: Option<bool>,
}

/// Parse a config file. `Ok(None)` if it does not exist; unreadable or invalid files are errors.
/// Runs before logging is set up, so nothing is logged here.
pub(crate) fn load_noise_toml(path: &Path) -> Result<Option<NoiseWorkerToml>> {
    if !path.exists() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let parsed = toml::from_str(&s).with_context(|| format!("parse config {}", path.display()))?;
    Ok(Some(parsed))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($idx:expr, $opts:expr, $idx_field:ident => $opts_field:ident) => {
        if let Some(v) = $idx.$idx_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
pub(crate) fn apply_file_to_opts(file: &NoiseWorkerToml, opts: &mut Opts) {
    let run = &file.settings;
    apply_file_opt!(run, opts, items => items);
    apply_file_opt!(run, opts, buffer_size => buffer_size);
    apply_file_opt!(run, opts, workers => workers);
    apply_file_opt!(run, opts, max_steps => max_steps);
    if let Some(ms) = run.step_ms {
        opts.step = Duration::from_millis(ms);
    }
    if run.seed.is_some() {
        opts.seed = run.seed;
    }
    apply_file_opt!(run, opts, fail_every => fail_every);
    if let Some(ms) = run.timeout_ms {
        opts.timeout = Some(Duration::from_millis(ms));
    }
    apply_file_opt!(run, opts, verbose => verbose);
    apply_file_opt!(run, opts, progress => progress);
    apply_file_opt!(run, opts, json => json);
}
