//! Cancellable run context: a done signal that workers can `select!` on.
//!
//! Cancelling drops the only sender of the done channel, so every receiver observes a
//! disconnect at once. Nothing is ever sent on it.

use crossbeam_channel::{Receiver, Sender, bounded, select};
use log::debug;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

struct Signal {
    cancelled: AtomicBool,
    trigger: Mutex<Option<Sender<()>>>,
    done_rx: Receiver<()>,
}

impl Signal {
    fn new() -> Arc<Self> {
        let (tx, rx) = bounded::<()>(1);
        Arc::new(Self {
            cancelled: AtomicBool::new(false),
            trigger: Mutex::new(Some(tx)),
            done_rx: rx,
        })
    }

    fn fire(&self) {
        self.cancelled.store(true, Ordering::Release);
        let sender = match self.trigger.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        drop(sender);
    }
}

/// Execution context handed to the producer, the processor and every hook.
///
/// Cheap to clone; clones share the same done signal.
#[derive(Clone)]
pub struct WorkContext {
    signal: Arc<Signal>,
}

/// Cancels the [`WorkContext`] it was created with. Clone it into signal handlers.
#[derive(Clone)]
pub struct CancelHandle {
    signal: Arc<Signal>,
}

impl WorkContext {
    /// A context that is never cancelled.
    pub fn background() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// A context plus the handle that cancels it.
    pub fn with_cancel() -> (Self, CancelHandle) {
        let signal = Signal::new();
        (
            Self {
                signal: Arc::clone(&signal),
            },
            CancelHandle { signal },
        )
    }

    /// A context cancelled automatically after `timeout`, or earlier through the handle.
    /// The timer thread exits as soon as the context is done either way.
    pub fn with_timeout(timeout: Duration) -> (Self, CancelHandle) {
        let (ctx, handle) = Self::with_cancel();
        let signal = Arc::clone(&ctx.signal);
        thread::spawn(move || {
            select! {
                recv(signal.done_rx) -> _ => {},
                default(timeout) => {
                    debug!("context deadline of {:?} reached", timeout);
                    signal.fire();
                }
            }
        });
        (ctx, handle)
    }

    pub fn is_cancelled(&self) -> bool {
        self.signal.cancelled.load(Ordering::Acquire)
    }

    /// Receiver that becomes disconnected once the context is cancelled. Use it as one arm of
    /// a `select!`; a `recv` on it only ever returns `Err`.
    pub fn done(&self) -> &Receiver<()> {
        &self.signal.done_rx
    }
}

impl CancelHandle {
    /// Cancel the context. Idempotent.
    pub fn cancel(&self) {
        self.signal.fire();
    }

    pub fn is_cancelled(&self) -> bool {
        self.signal.cancelled.load(Ordering::Acquire)
    }
}

impl fmt::Debug for WorkContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkContext")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
