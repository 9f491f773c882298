// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Counting worker and resetting controller
//!
//! The worker drives the counter chain in a loop, printing each value. The
//! controller fires resets at random intervals from its own thread.

use crate::config::DemoConfig;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use reguard_core::{CounterLayer, GuardError, RegisterError, ResetCoordinator, Resettable};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Line printed when a call chain unwinds because of a reset
pub const RESET_NOTICE: &str = "Counter was reset!";

/// Totals reported once a bounded run finishes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Chain invocations that completed
    pub counted: u64,
    /// Resets the worker observed
    pub observed: u64,
    /// Resets the controller started
    pub triggered: u64,
}

/// Counter chain wired to a reset coordinator
pub struct Demo {
    coordinator: Arc<ResetCoordinator>,
    chain: Arc<CounterLayer>,
}

impl Demo {
    pub fn new(config: &DemoConfig) -> Result<Self, RegisterError> {
        let coordinator = Arc::new(ResetCoordinator::new(config.reset_config()));
        let chain = Arc::new(CounterLayer::chain(config.depth));

        let target = Arc::clone(&chain);
        coordinator.register_handler(move || target.reset())?;

        Ok(Self { coordinator, chain })
    }

    pub fn coordinator(&self) -> &ResetCoordinator {
        &self.coordinator
    }

    /// Run until the worker has observed `config.resets` resets, or forever
    /// when no limit is set.
    pub fn run<W>(&self, config: &DemoConfig, out: W) -> anyhow::Result<Summary>
    where
        W: Write + Send + 'static,
    {
        let done = Arc::new(AtomicBool::new(false));

        let worker = {
            let coordinator = Arc::clone(&self.coordinator);
            let chain = Arc::clone(&self.chain);
            let done = Arc::clone(&done);
            let limit = config.resets;
            thread::Builder::new()
                .name("counter".to_string())
                .spawn(move || {
                    let result = count(&coordinator, &*chain, limit, out);
                    done.store(true, Ordering::Release);
                    result
                })?
        };

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let triggered = drive_resets(&self.coordinator, config, &mut rng, &done);

        let (counted, observed) = worker
            .join()
            .map_err(|_| anyhow::anyhow!("counter thread panicked"))??;

        Ok(Summary {
            counted,
            observed,
            triggered,
        })
    }
}

/// Worker loop: one scoped chain invocation per iteration.
///
/// Returns `(counted, observed)` once `limit` resets have been observed.
pub fn count<W: Write>(
    coordinator: &ResetCoordinator,
    chain: &dyn Resettable,
    limit: Option<u64>,
    mut out: W,
) -> std::io::Result<(u64, u64)> {
    let mut counted = 0;
    let mut observed = 0;

    while !limit.is_some_and(|limit| observed >= limit) {
        let result = {
            let mut scope = coordinator.lock();
            chain.perform(&mut scope)
        };

        match result {
            Ok(value) => {
                counted += 1;
                writeln!(out, "{}", value)?;
            }
            Err(GuardError::Reset(_)) => {
                observed += 1;
                writeln!(out, "{}", RESET_NOTICE)?;
            }
            Err(GuardError::AckTimeout(e)) => {
                tracing::warn!(error = %e, "reset still pending, retrying");
            }
        }
    }

    out.flush()?;
    Ok((counted, observed))
}

/// Controller loop: sleep a random interval, then reset. Stops when `done` is set.
fn drive_resets(
    coordinator: &ResetCoordinator,
    config: &DemoConfig,
    rng: &mut impl Rng,
    done: &AtomicBool,
) -> u64 {
    let min = config.min_interval.as_micros() as u64;
    let max = config.max_interval.as_micros() as u64;
    let mut triggered = 0;

    while !done.load(Ordering::Acquire) {
        thread::sleep(Duration::from_micros(rng.gen_range(min..=max)));
        if coordinator.trigger_reset() {
            triggered += 1;
        }
    }

    tracing::debug!(triggered, "controller stopped");
    triggered
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
