// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for guard checks and handler registration

use std::time::Duration;
use thiserror::Error;

/// Raised by a strong check that observed and acknowledged a reset.
///
/// Not a fault: the in-flight call chain is stale and must unwind so the
/// outermost caller can retry from the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("resource was reset")]
pub struct ResourceWasReset;

/// A bounded guard check gave up before the reset was acknowledged
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("reset not acknowledged within {0:?}")]
pub struct AckTimeout(pub Duration);

/// Errors a guarded layer can propagate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error(transparent)]
    Reset(#[from] ResourceWasReset),
    #[error(transparent)]
    AckTimeout(#[from] AckTimeout),
}

impl GuardError {
    pub fn is_reset(&self) -> bool {
        matches!(self, GuardError::Reset(_))
    }
}

/// Errors from registering a reset handler
#[derive(Debug, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("reset handler already registered for {0}")]
    AlreadyRegistered(String),
}
