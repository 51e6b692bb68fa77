//! CLI plumbing around the work engine: argument parsing, run handler, progress bar.

pub mod arg_parser;
pub mod cli;
pub mod progress;

pub use arg_parser::Cli;
pub use cli::{build_opts, handle_run};
