pub mod config;
pub mod logger;
pub(crate) mod noise_toml;

pub use config::*;
pub use logger::{build_logger, setup_logging};
