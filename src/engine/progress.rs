//! Progress bar utilities for displaying run status

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Configuration for creating a progress bar
pub struct ProgressBarConfig {
    pub total: usize,
    pub desc: &'static str,
    pub animation: Animation,
}

impl ProgressBarConfig {
    /// Create a new progress bar configuration
    pub fn new(total: usize, desc: &'static str, animation: Animation) -> Self {
        Self {
            total,
            desc,
            animation,
        }
    }
}

/// Create a progress bar with the given configuration
pub fn create_progress_bar(config: ProgressBarConfig) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = config.total,
        desc = config.desc,
        animation = config.animation,
        unit = " jobs"
    )))
}

/// Update progress bar if available
/// Uses try_lock so a worker never waits on another worker's redraw
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    // If lock is contended, skip update (bar catches up in finish_progress_bar)
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update(n);
    }
}

/// Set the bar to `done` (skipped try_lock updates are lost otherwise) and redraw once.
pub fn finish_progress_bar(pb: &ProgressBar, done: usize) {
    let mut bar = pb.lock().unwrap_or_else(|p| p.into_inner());
    let _ = bar.update_to(done);
    let _ = bar.refresh();
    eprintln!();
}
