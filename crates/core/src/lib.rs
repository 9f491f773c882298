// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! reguard-core: reset coordination for shared mutable resources
//!
//! This crate provides:
//! - A reset coordinator letting a controller thread reinitialize a resource
//!   while a worker is inside a chain of guarded calls on it
//! - Weak (resume) and strong (abort) guard checks reachable only through a
//!   scoped lock
//! - A guarded counter chain used as the reference resource

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod chain;
pub mod coordination;

// Re-exports
pub use chain::{Counter, CounterLayer, Intermediate, Resettable};
pub use coordination::{
    AckTimeout, GuardError, RegisterError, ResetConfig, ResetCoordinator, ResetHandler,
    ResetScope, ResetState, ResourceWasReset,
};
