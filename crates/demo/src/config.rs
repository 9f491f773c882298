// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Demo configuration
//!
//! Values come from an optional TOML file; command-line flags override them.

use reguard_core::ResetConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid depth {0}: the chain needs at least one layer")]
    InvalidDepth(usize),

    #[error("Invalid reset interval: min {min:?} is greater than max {max:?}")]
    InvalidInterval { min: Duration, max: Duration },
}

/// Demo configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Number of layers in the counter chain, counter included
    pub depth: usize,
    /// Shortest pause between two reset triggers
    #[serde(with = "humantime_serde")]
    pub min_interval: Duration,
    /// Longest pause between two reset triggers
    #[serde(with = "humantime_serde")]
    pub max_interval: Duration,
    /// Stop once the worker has observed this many resets
    pub resets: Option<u64>,
    /// Bound on how long a guard check waits for a pending reset
    #[serde(with = "humantime_serde")]
    pub ack_timeout: Option<Duration>,
    /// Seed for the reset interval generator
    pub seed: Option<u64>,
    /// Write logs to this file instead of stderr
    pub log_file: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            min_interval: Duration::from_micros(500),
            max_interval: Duration::from_micros(5500),
            resets: None,
            ack_timeout: None,
            seed: None,
            log_file: None,
        }
    }
}

impl DemoConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::InvalidDepth(self.depth));
        }
        if self.min_interval > self.max_interval {
            return Err(ConfigError::InvalidInterval {
                min: self.min_interval,
                max: self.max_interval,
            });
        }
        Ok(())
    }

    /// Coordinator configuration derived from this demo configuration
    pub fn reset_config(&self) -> ResetConfig {
        let config = ResetConfig::new("counter");
        match self.ack_timeout {
            Some(timeout) => config.with_ack_timeout(timeout),
            None => config,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
