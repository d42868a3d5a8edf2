// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Argument and configuration errors exit 255 before anything runs.

use crate::prelude::*;

#[test]
fn help_shows_usage_and_exits_zero() {
    cli().arg("--help").passes().stdout_has("Usage:").stdout_has("--out-bucket");
}

#[test]
fn version_exits_zero() {
    cli().arg("--version").passes().stdout_has("0.2");
}

#[test]
fn no_arguments_is_a_usage_error() {
    cli().exits_with(255).stderr_has("Usage:");
}

#[test]
fn missing_command_is_a_usage_error() {
    let store = Store::new();
    store.s3io("runs/1").exits_with(255);
    assert!(store.keys("logs").is_empty());
}

#[test]
fn in_bucket_requires_in_path() {
    let store = Store::new();
    store.s3io("runs/1").args(["--in-bucket", "inputs", "cat"]).exits_with(255);
}

#[test]
fn missing_endpoint_is_a_usage_error() {
    cli()
        .args(["--out-bucket", "logs", "--out-dir", "runs/1", "true"])
        .exits_with(255)
        .stderr_has("S3IO_ENDPOINT");
}

#[test]
fn https_endpoint_is_rejected() {
    cli()
        .args(["--endpoint", "https://s3.example.com", "-b", "logs", "-d", "runs/1", "true"])
        .exits_with(255)
        .stderr_has("https://s3.example.com");
}

#[test]
fn dot_segments_in_out_dir_are_rejected() {
    let store = Store::new();
    store.s3io("runs/../escape").arg("true").exits_with(255).stderr_has("--out-dir");
}
