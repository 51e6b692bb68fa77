//! Counting generator used as the demo producer.

use anyhow::Result;
use log::debug;

use super::Model;
use crate::work::{FetchedCounter, WorkContext, WorkSender};

/// Generates `items_to_fetch` models with ids `0..items_to_fetch`.
#[derive(Clone, Debug)]
pub struct Repository {
    items_to_fetch: usize,
}

impl Repository {
    pub fn new(items_to_fetch: usize) -> Self {
        Self { items_to_fetch }
    }

    pub fn items_to_fetch(&self) -> usize {
        self.items_to_fetch
    }

    /// Push every model into `tx`, counting each one after it is queued.
    /// Stops quietly when the context is cancelled or no worker is left.
    pub fn fetch_data(
        &self,
        _ctx: &WorkContext,
        fetched: &FetchedCounter<'_>,
        tx: &WorkSender<'_, Model>,
    ) -> Result<()> {
        for i in 0..self.items_to_fetch {
            let item = Model::new(i, format!("Item: {i}"), format!("This is the Item {i}"));
            if let Err(e) = tx.send(item) {
                debug!("repository stopped at item {i}: {e}");
                break;
            }
            fetched.increment();
        }
        Ok(())
    }
}
