// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! reguard - reset coordination demo
//!
//! Counts through a chain of guarded layers on a worker thread while the main
//! thread resets the chain at random intervals.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod run;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::config::{ConfigError, DemoConfig};
use crate::run::Demo;

#[derive(Parser)]
#[command(
    name = "reguard",
    version,
    about = "Count through a guarded chain while resetting it at random intervals"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of layers in the counter chain
    #[arg(long)]
    depth: Option<usize>,

    /// Shortest pause between resets (e.g. "500us")
    #[arg(long, value_parser = humantime::parse_duration)]
    min_interval: Option<Duration>,

    /// Longest pause between resets (e.g. "5ms")
    #[arg(long, value_parser = humantime::parse_duration)]
    max_interval: Option<Duration>,

    /// Stop after this many resets have been observed
    #[arg(long)]
    resets: Option<u64>,

    /// Give up waiting on a pending reset after this long, then retry
    #[arg(long, value_parser = humantime::parse_duration)]
    ack_timeout: Option<Duration>,

    /// Seed for the reset interval generator
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// File configuration (or defaults) with flags applied on top
    fn resolve(&self) -> Result<DemoConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => DemoConfig::load(path)?,
            None => DemoConfig::default(),
        };

        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(min) = self.min_interval {
            config.min_interval = min;
        }
        if let Some(max) = self.max_interval {
            config.max_interval = max;
        }
        if self.resets.is_some() {
            config.resets = self.resets;
        }
        if self.ack_timeout.is_some() {
            config.ack_timeout = self.ack_timeout;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.log_file.is_some() {
            config.log_file.clone_from(&self.log_file);
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve()?;

    // Set up logging
    let _log_guard = setup_logging(&config)?;

    info!(
        depth = config.depth,
        min_interval = ?config.min_interval,
        max_interval = ?config.max_interval,
        resets = ?config.resets,
        "starting"
    );

    let demo = Demo::new(&config)?;
    let summary = demo.run(&config, std::io::stdout())?;

    info!(
        counted = summary.counted,
        observed = summary.observed,
        triggered = summary.triggered,
        cycles = demo.coordinator().cycles(),
        "finished"
    );
    Ok(())
}

fn setup_logging(
    config: &DemoConfig,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(log_path) = &config.log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    };

    // Create log directory if needed
    let dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;
    let file_name = log_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("invalid log file path: {}", log_path.display()))?;

    let file_appender = tracing_appender::rolling::never(&dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(Some(guard))
}
