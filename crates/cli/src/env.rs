// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;
use std::time::Duration;

use s3io_capture::DEFAULT_KILL_GRACE;

/// Object store endpoint when `--endpoint` is not given.
pub fn endpoint() -> Option<String> {
    std::env::var("S3IO_ENDPOINT").ok().filter(|s| !s.is_empty())
}

/// Staging directory when `--staging-dir` is not given.
pub fn staging_dir() -> Option<PathBuf> {
    std::env::var("S3IO_STAGING_DIR").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Log filter directives (default `info`).
pub fn log_filter() -> String {
    std::env::var("S3IO_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "info".to_string())
}

/// Grace period between SIGTERM and SIGKILL for a cancelled child
/// (default 5s, configurable via `S3IO_KILL_GRACE_MS`).
pub fn kill_grace() -> Duration {
    std::env::var("S3IO_KILL_GRACE_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_KILL_GRACE)
}
