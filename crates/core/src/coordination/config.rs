// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reset coordinator configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reset coordinator configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetConfig {
    /// Name identifying the guarded resource in logs
    pub name: String,
    /// Upper bound for [`ResetScope::check`](super::ResetScope::check) to wait
    /// on a pending reset; `None` waits indefinitely
    #[serde(default, with = "humantime_serde")]
    pub ack_timeout: Option<Duration>,
}

impl ResetConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ack_timeout: None,
        }
    }

    pub fn with_ack_timeout(mut self, timeout: Duration) -> Self {
        self.ack_timeout = Some(timeout);
        self
    }
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self::new("resource")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
