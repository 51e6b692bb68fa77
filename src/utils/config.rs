//! Application configuration constants.
//! Defaults and package-derived names in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// `.noise-worker.toml`
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Demo run ----

/// Defaults for the demo run when neither the config file nor the CLI set a value.
pub struct RunDefaults;

impl RunDefaults {
    /// Items the repository generates.
    pub const ITEMS_TO_FETCH: usize = 1000;
    /// Channel capacity between repository and workers.
    pub const BUFFER_SIZE: usize = 100;
    /// Worker threads.
    pub const WORKERS: usize = 100;
    /// A job sleeps `0..MAX_SLEEP_STEPS` steps.
    pub const MAX_SLEEP_STEPS: u32 = 10;
    /// One sleep step (ms).
    pub const SLEEP_STEP_MS: u64 = 100;
}
