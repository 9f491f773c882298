// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box tests for the reguard binary.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const RESET_NOTICE: &str = "Counter was reset!";

fn reguard() -> Command {
    let mut cmd = Command::cargo_bin("reguard").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fast(cmd: &mut Command) -> &mut Command {
    cmd.args(["--min-interval", "50us", "--max-interval", "200us", "--seed", "7"])
}

fn notices(stdout: &[u8]) -> usize {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|line| *line == RESET_NOTICE)
        .count()
}

#[test]
fn bounded_run_prints_one_notice_per_reset() {
    let output = fast(&mut reguard())
        .args(["--resets", "2"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(notices(&output.stdout), 2);
}

#[test]
fn run_stops_right_after_last_reset() {
    let output = fast(&mut reguard())
        .args(["--resets", "1", "--depth", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let values: Vec<u64> = stdout
        .lines()
        .take_while(|line| *line != RESET_NOTICE)
        .map(|line| line.parse().unwrap())
        .collect();
    assert_eq!(values, (1..=values.len() as u64).collect::<Vec<_>>());

    let mut rest = stdout.lines().skip(values.len());
    assert_eq!(rest.next(), Some(RESET_NOTICE));
    assert_eq!(rest.next(), None);
}

#[test]
fn config_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reguard.toml");
    fs::write(
        &path,
        "depth = 3\nmin_interval = \"50us\"\nmax_interval = \"100us\"\nresets = 3\n",
    )
    .unwrap();

    let output = reguard()
        .arg("--config")
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(notices(&output.stdout), 3);
}

#[test]
fn flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reguard.toml");
    fs::write(&path, "resets = 5\n").unwrap();

    let output = fast(&mut reguard())
        .arg("--config")
        .arg(&path)
        .args(["--resets", "1"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(notices(&output.stdout), 1);
}

#[test]
fn zero_depth_is_rejected() {
    reguard()
        .args(["--depth", "0", "--resets", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid depth 0"));
}

#[test]
fn inverted_interval_is_rejected() {
    reguard()
        .args(["--min-interval", "5ms", "--max-interval", "1ms", "--resets", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid reset interval"));
}

#[test]
fn missing_config_file_is_reported() {
    reguard()
        .args(["--config", "/nonexistent/reguard.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/reguard.toml"));
}

#[test]
fn log_file_receives_reset_events() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("logs").join("reguard.log");

    fast(&mut reguard())
        .env("RUST_LOG", "info")
        .args(["--resets", "1"])
        .arg("--log-file")
        .arg(&log_path)
        .assert()
        .success();

    let logs = fs::read_to_string(&log_path).unwrap();
    assert!(logs.contains("reset complete"), "{logs}");
    assert!(logs.contains("finished"), "{logs}");
}
