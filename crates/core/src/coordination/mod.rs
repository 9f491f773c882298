// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination primitives for resettable shared resources
//!
//! This module provides:
//! - **ResetCoordinator** - Hands a resource off between a worker and a resetting controller
//! - **ResetScope** - Scoped lock that gates the weak and strong guard checks
//! - **ResetState** - The tri-state reset cycle

pub mod config;
pub mod coordinator;
pub mod error;
pub mod state;

pub use config::ResetConfig;
pub use coordinator::{ResetCoordinator, ResetHandler, ResetScope};
pub use error::{AckTimeout, GuardError, RegisterError, ResourceWasReset};
pub use state::ResetState;
