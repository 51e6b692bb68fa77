//! noise-worker CLI: run the demo work engine and print a summary.

use anyhow::Result;
use clap::Parser;
use noise_worker::engine::arg_parser::Cli;
use noise_worker::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    // Optional `.env` (e.g. RUST_LOG) before logging is set up.
    let _ = dotenvy::dotenv();
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
