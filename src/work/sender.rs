//! Producer side of the item channel.

use crossbeam_channel::{Select, Sender};
use std::fmt;

use super::WorkContext;

/// Why an item could not be pushed. The item is handed back in both cases.
pub enum SendError<T> {
    /// The run's context was cancelled while waiting for room in the channel.
    Cancelled(T),
    /// Every worker has already exited; nobody will ever receive the item.
    Disconnected(T),
}

impl<T> fmt::Debug for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Cancelled(_) => f.write_str("Cancelled(..)"),
            SendError::Disconnected(_) => f.write_str("Disconnected(..)"),
        }
    }
}

impl<T> fmt::Display for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Cancelled(_) => f.write_str("context cancelled before the item was queued"),
            SendError::Disconnected(_) => f.write_str("all workers have exited"),
        }
    }
}

impl<T> std::error::Error for SendError<T> {}

impl<T> SendError<T> {
    pub fn into_inner(self) -> T {
        match self {
            SendError::Cancelled(item) | SendError::Disconnected(item) => item,
        }
    }
}

/// Pushes items into the engine's bounded channel. The engine closes the channel by dropping
/// this once the producer returns.
pub struct WorkSender<'c, T> {
    tx: Sender<T>,
    ctx: &'c WorkContext,
}

impl<'c, T> WorkSender<'c, T> {
    pub(crate) fn new(tx: Sender<T>, ctx: &'c WorkContext) -> Self {
        Self { tx, ctx }
    }

    /// Queue `item`, blocking while the channel is full. Returns early if the context is
    /// cancelled or every worker is gone, so a producer that stops on `Err` never hangs.
    pub fn send(&self, item: T) -> Result<(), SendError<T>> {
        let mut sel = Select::new();
        let send_idx = sel.send(&self.tx);
        let done_idx = sel.recv(self.ctx.done());
        let oper = sel.select();
        match oper.index() {
            i if i == send_idx => oper
                .send(&self.tx, item)
                .map_err(|e| SendError::Disconnected(e.into_inner())),
            i if i == done_idx => {
                let _ = oper.recv(self.ctx.done());
                Err(SendError::Cancelled(item))
            }
            _ => unreachable!("select returned an unregistered operation"),
        }
    }

    /// Items queued but not yet taken by a worker.
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.tx.capacity()
    }
}
