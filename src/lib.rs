//! noise-worker: a generic concurrent work engine.
//!
//! One producer pushes items into a bounded channel; a fixed pool of worker threads pulls
//! them, runs a processing function on each, and records counts and errors in a shared
//! [`WorkResults`]. Cancellation is cooperative through a [`WorkContext`].
//!
//! ```ignore
//! let config = EngineConfig::new(16, 4)?;
//! let engine = WorkEngine::new(
//!     config,
//!     |_ctx, fetched, tx| {
//!         for i in 0..100 {
//!             if tx.send(i).is_err() {
//!                 break;
//!             }
//!             fetched.increment();
//!         }
//!         Ok(())
//!     },
//!     |_ctx, item: u32| {
//!         anyhow::ensure!(item != 42, "no answers here");
//!         Ok(())
//!     },
//! );
//! let results = engine.start(&WorkContext::background());
//! assert_eq!(results.successful_count(), 99);
//! ```

pub mod engine;
pub mod example;
pub mod types;
pub mod utils;
pub mod work;

/// Re-export types for API
pub use types::*;
pub use work::{
    CancelHandle, EngineConfig, FetchedCounter, SendError, WorkContext, WorkEngine, WorkHooks,
    WorkResults, WorkSender,
};

/// Result alias used by public noise-worker API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
