//! The demo job: sleep a random number of steps, then stamp the model.

use anyhow::{Result, bail};
use rand::Rng;
use rand::rngs::StdRng;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use super::Model;
use crate::utils::config::RunDefaults;
use crate::work::WorkContext;

/// Sleeps `rng.gen_range(0..max_steps) * step` per item. The random source is owned here and
/// passed in by whoever builds the service.
pub struct DomainService {
    rng: Mutex<StdRng>,
    max_steps: u32,
    step: Duration,
    fail_every: usize,
}

impl DomainService {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            max_steps: RunDefaults::MAX_SLEEP_STEPS,
            step: Duration::from_millis(RunDefaults::SLEEP_STEP_MS),
            fail_every: 0,
        }
    }

    /// Sleep between 0 and `max_steps - 1` steps of `step`. `max_steps == 0` disables sleeping.
    pub fn with_sleep(mut self, max_steps: u32, step: Duration) -> Self {
        self.max_steps = max_steps;
        self.step = step;
        self
    }

    /// Fail every item whose `id + 1` is a multiple of `n`. 0 disables.
    pub fn with_fail_every(mut self, n: usize) -> Self {
        self.fail_every = n;
        self
    }

    fn next_sleep(&self) -> Duration {
        if self.max_steps == 0 {
            return Duration::ZERO;
        }
        let steps = {
            let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
            rng.gen_range(0..self.max_steps)
        };
        self.step * steps
    }

    /// Not interruptible: once started, the sleep runs to completion even if `ctx` is cancelled.
    pub fn a_very_important_job(&self, _ctx: &WorkContext, item: Model) -> Result<()> {
        let sleep = self.next_sleep();
        thread::sleep(sleep);

        if self.fail_every > 0 && (item.id() + 1).is_multiple_of(self.fail_every) {
            bail!("{} rejected after {:?}", item.name(), sleep);
        }

        let _ = item.with_value(sleep.as_millis() as u64);
        Ok(())
    }
}
