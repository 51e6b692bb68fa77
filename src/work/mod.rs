//! Work engine: bounded channel, worker pool, cancellation, result aggregation.

pub mod context;
pub mod delegates;
pub mod orchestrator;
pub mod results;
pub mod sender;
mod worker;

pub use context::{CancelHandle, WorkContext};
pub use delegates::{FetchWork, ProcessItem, WorkHooks, WorkLogger, empty_work_logger};
pub use orchestrator::{EngineConfig, WorkEngine};
pub use results::{FetchedCounter, WorkResults};
pub use sender::{SendError, WorkSender};
