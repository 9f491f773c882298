// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reset coordinator
//!
//! Lets a controller thread reinitialize a shared resource while a worker is
//! in the middle of a chain of guarded calls on it. The worker holds a
//! [`ResetScope`] for each unit of work and calls a guard check at the entry
//! of every layer. A reset requested mid-chain is observed by the next guard
//! check exactly once: the weak check reports it and lets the caller resume,
//! the strong check turns it into [`ResourceWasReset`] so the chain unwinds.
//!
//! The handler runs on the controller thread under the coordinator's mutex.
//! It can only get the mutex while the worker is outside a scope or parked in
//! a guard check, so it never overlaps a layer's work.

use super::config::ResetConfig;
use super::error::{AckTimeout, GuardError, RegisterError, ResourceWasReset};
use super::state::{AtomicResetState, ResetState};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Callback that reinitializes the guarded resource
pub type ResetHandler = Box<dyn FnMut() + Send>;

/// Data protected by the coordinator's mutex
#[derive(Default)]
struct HandlerSlot {
    handler: Option<ResetHandler>,
}

/// Coordinates resets of a shared resource between one controller and a
/// lock-serialized worker path.
///
/// Share it through an `Arc`; there is no global instance.
pub struct ResetCoordinator {
    config: ResetConfig,
    state: AtomicResetState,
    slot: Mutex<HandlerSlot>,
    ack: Condvar,
    cycles: AtomicU64,
}

impl ResetCoordinator {
    pub fn new(config: ResetConfig) -> Self {
        Self {
            config,
            state: AtomicResetState::default(),
            slot: Mutex::new(HandlerSlot::default()),
            ack: Condvar::new(),
            cycles: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &ResetConfig {
        &self.config
    }

    /// Current phase of the reset cycle
    pub fn state(&self) -> ResetState {
        self.state.load()
    }

    /// Number of times the handler has run
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Acquire)
    }

    /// Acquire exclusive access for a unit of guarded work.
    ///
    /// Guard checks are only available on the returned scope. The lock is
    /// released when the scope is dropped.
    pub fn lock(&self) -> ResetScope<'_> {
        ResetScope {
            coordinator: self,
            guard: self.slot.lock(),
        }
    }

    /// Non-blocking variant of [`lock`](Self::lock)
    pub fn try_lock(&self) -> Option<ResetScope<'_>> {
        self.slot.try_lock().map(|guard| ResetScope {
            coordinator: self,
            guard,
        })
    }

    /// Install the callback run on every reset cycle.
    ///
    /// Only one handler may be registered; later registrations are rejected
    /// and the first handler stays in place. Blocks while a worker holds a
    /// scope, so do not call it from inside one.
    pub fn register_handler<F>(&self, handler: F) -> Result<(), RegisterError>
    where
        F: FnMut() + Send + 'static,
    {
        let mut slot = self.slot.lock();
        if slot.handler.is_some() {
            tracing::warn!(name = %self.config.name, "reset handler already registered");
            return Err(RegisterError::AlreadyRegistered(self.config.name.clone()));
        }
        slot.handler = Some(Box::new(handler));
        tracing::debug!(name = %self.config.name, "reset handler registered");
        Ok(())
    }

    /// Reset the guarded resource.
    ///
    /// Returns `false` without doing anything when a cycle is already in
    /// flight; overlapping triggers collapse into that cycle. Otherwise runs
    /// the handler once, marks the reset as awaiting acknowledgement, wakes
    /// any worker parked in a guard check and returns `true`.
    ///
    /// The handler must not lock this coordinator.
    pub fn trigger_reset(&self) -> bool {
        if let Err(observed) = self
            .state
            .transition(ResetState::Valid, ResetState::ResetRequired)
        {
            tracing::debug!(name = %self.config.name, state = %observed, "reset already in flight");
            return false;
        }
        tracing::debug!(name = %self.config.name, "reset requested");

        let cycle = {
            let mut slot = self.slot.lock();
            let cycle = self.cycles.load(Ordering::Acquire) + 1;
            let span = tracing::info_span!("reset", name = %self.config.name, cycle);
            let _guard = span.enter();

            match slot.handler.as_mut() {
                Some(handler) => handler(),
                None => tracing::warn!("no reset handler registered, nothing reinitialized"),
            }

            self.cycles.store(cycle, Ordering::Release);
            self.state.store(ResetState::AckExpected);
            cycle
        };
        let woken = self.ack.notify_all();

        tracing::info!(name = %self.config.name, cycle, woken, "reset complete");
        true
    }
}

impl Default for ResetCoordinator {
    fn default() -> Self {
        Self::new(ResetConfig::default())
    }
}

impl std::fmt::Debug for ResetCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetCoordinator")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("cycles", &self.cycles())
            .finish_non_exhaustive()
    }
}

/// Exclusive access to a [`ResetCoordinator`] for one unit of guarded work.
///
/// Holding a scope is the only way to run a guard check.
pub struct ResetScope<'a> {
    coordinator: &'a ResetCoordinator,
    guard: MutexGuard<'a, HandlerSlot>,
}

impl<'a> ResetScope<'a> {
    pub fn coordinator(&self) -> &'a ResetCoordinator {
        self.coordinator
    }

    /// Check for a reset and resume if one happened.
    ///
    /// Returns `true` when the resource is valid. When a reset is pending,
    /// waits (releasing the lock) until the handler has run, acknowledges it
    /// and returns `false`; the caller should reinitialize any local state it
    /// derived from the resource and carry on.
    pub fn weak_check(&mut self) -> bool {
        if self.coordinator.state.load().is_valid() {
            return true;
        }

        let coordinator = self.coordinator;
        coordinator.ack.wait_while(&mut self.guard, |_| {
            coordinator.state.load() == ResetState::ResetRequired
        });
        self.acknowledge();
        false
    }

    /// Check for a reset and abort if one happened.
    ///
    /// Same wait as [`weak_check`](Self::weak_check), but a reset yields
    /// [`ResourceWasReset`] so the whole call chain unwinds.
    pub fn strong_check(&mut self) -> Result<(), ResourceWasReset> {
        if self.weak_check() {
            Ok(())
        } else {
            Err(ResourceWasReset)
        }
    }

    /// [`weak_check`](Self::weak_check) that gives up after `timeout`.
    ///
    /// On timeout the reset stays pending and the next check waits again.
    pub fn weak_check_timeout(&mut self, timeout: Duration) -> Result<bool, AckTimeout> {
        if self.coordinator.state.load().is_valid() {
            return Ok(true);
        }

        let coordinator = self.coordinator;
        let result = coordinator.ack.wait_while_for(
            &mut self.guard,
            |_| coordinator.state.load() == ResetState::ResetRequired,
            timeout,
        );
        // The handler may have finished right as the deadline passed
        if result.timed_out() && coordinator.state.load() == ResetState::ResetRequired {
            tracing::warn!(
                name = %coordinator.config.name,
                timeout_ms = timeout.as_millis() as u64,
                "reset not acknowledged in time"
            );
            return Err(AckTimeout(timeout));
        }
        self.acknowledge();
        Ok(false)
    }

    /// [`strong_check`](Self::strong_check) that gives up after `timeout`
    pub fn strong_check_timeout(&mut self, timeout: Duration) -> Result<(), GuardError> {
        if self.weak_check_timeout(timeout)? {
            Ok(())
        } else {
            Err(ResourceWasReset.into())
        }
    }

    /// Strong check honouring the configured `ack_timeout`
    pub fn check(&mut self) -> Result<(), GuardError> {
        match self.coordinator.config.ack_timeout {
            Some(timeout) => self.strong_check_timeout(timeout),
            None => Ok(self.strong_check()?),
        }
    }

    /// Release the lock. Equivalent to dropping the scope.
    pub fn release(self) {}

    /// Complete the cycle. A second waiter finding it already `Valid` leaves it.
    fn acknowledge(&self) {
        let acked = self
            .coordinator
            .state
            .transition(ResetState::AckExpected, ResetState::Valid)
            .is_ok();
        tracing::debug!(
            name = %self.coordinator.config.name,
            cycle = self.coordinator.cycles(),
            acked,
            "reset observed"
        );
    }
}

impl std::fmt::Debug for ResetScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetScope")
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
