// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reset state machine
//!
//! A single tri-state value shared by the controller and the worker path.
//! Reads on the fast path are lock-free; transitions that need a rendezvous
//! happen under the coordinator's mutex.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};

/// Phase of the reset cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ResetState {
    /// Resource is usable; guard checks pass straight through
    Valid = 0,
    /// A reset was requested but the handler has not run yet
    ResetRequired = 1,
    /// The handler ran; the next guard check acknowledges and returns to `Valid`
    AckExpected = 2,
}

impl ResetState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ResetState::Valid,
            1 => ResetState::ResetRequired,
            _ => ResetState::AckExpected,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ResetState::Valid)
    }

    /// True while a cycle is in flight (requested or awaiting acknowledgement)
    pub fn is_pending(&self) -> bool {
        !self.is_valid()
    }
}

impl std::fmt::Display for ResetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResetState::Valid => "valid",
            ResetState::ResetRequired => "reset_required",
            ResetState::AckExpected => "ack_expected",
        };
        write!(f, "{}", name)
    }
}

/// Atomic cell holding a [`ResetState`]
#[derive(Debug)]
pub(crate) struct AtomicResetState(AtomicU8);

impl AtomicResetState {
    pub(crate) fn new(state: ResetState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub(crate) fn load(&self) -> ResetState {
        ResetState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn store(&self, state: ResetState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Move `current -> new` only if the cell still holds `current`.
    ///
    /// Returns the observed state on failure.
    pub(crate) fn transition(
        &self,
        current: ResetState,
        new: ResetState,
    ) -> Result<(), ResetState> {
        self.0
            .compare_exchange(current as u8, new as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(ResetState::from_u8)
    }
}

impl Default for AtomicResetState {
    fn default() -> Self {
        Self::new(ResetState::Valid)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
