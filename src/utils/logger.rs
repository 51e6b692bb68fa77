use colored::Colorize;
use env_logger::{Builder, Logger};
use log::Level;
use std::io::Write;

/// Install the global logger. `RUST_LOG`, when set, replaces the default filters entirely.
pub fn setup_logging(verbose: bool) {
    let env_filter = std::env::var("RUST_LOG").ok();
    let logger = build_logger(verbose, env_filter.as_deref());
    let max_level = logger.filter();
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(max_level);
    }
}

/// Build the logger without installing it. `env_filter` uses `RUST_LOG` syntax.
pub fn build_logger(verbose: bool, env_filter: Option<&str>) -> Logger {
    use log::LevelFilter;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Crate target uses underscores even though the package name has a dash.
    let target = env!("CARGO_PKG_NAME").replace('-', "_");

    let mut builder = Builder::new();
    match env_filter {
        Some(filters) if !filters.trim().is_empty() => {
            builder.parse_filters(filters);
        }
        _ => {
            builder
                .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
                .filter_module(&target, level); // Our crate: use requested level
        }
    }
    builder
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        Level::Error => "ERROR".red(),
                        _ => unreachable!(),
                    };
                    let path = record.target().to_string().white();
                    format!("[{} {} {}] {}", name.cyan(), level_str, path, record.args())
                }
                _ => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .build()
}
