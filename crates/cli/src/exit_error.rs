// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

use s3io_capture::ChildError;

/// Exit code for bad arguments or configuration.
pub const USAGE: i32 = 255;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }

    /// Mirror the child's outcome the way a shell would.
    pub fn from_child(err: &ChildError) -> Self {
        let code = match err {
            ChildError::Exited { code, .. } if (1..=255).contains(code) => *code,
            ChildError::Exited { .. } => 1,
            ChildError::Signaled { signal, .. } => 128 + signal,
            ChildError::Cancelled { .. } => 130,
            ChildError::Spawn { .. } => 127,
            ChildError::Wait { .. } => 1,
        };
        Self::new(code, err.to_string())
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
