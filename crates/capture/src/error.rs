// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the capture pipeline.
//!
//! Three classes, handled differently by [`crate::Run`]:
//! - [`RunError`]: setup failures. The run aborts and publishes nothing.
//! - [`ChildError`]: the child's own failure. Returned as the run's result
//!   after all artifacts have been published.
//! - [`CaptureError`] / [`UploadError`]: infrastructure failures. Logged and
//!   recorded in the metadata, never returned.

use s3io_core::{PathError, StreamKind};
use s3io_store::StoreError;
use thiserror::Error;

/// Fatal errors that abort a run before anything is published.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to create staging buffer: {0}")]
    Staging(#[source] std::io::Error),

    #[error("child {0} stream was not captured")]
    MissingStream(StreamKind),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Failure of the child process itself.
#[derive(Debug, Error)]
pub enum ChildError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("`{program}` exited with code {code}")]
    Exited { program: String, code: i32 },

    #[error("`{program}` was killed by signal {signal}")]
    Signaled { program: String, signal: i32 },

    #[error("failed waiting for `{program}`: {source}")]
    Wait {
        program: String,
        source: std::io::Error,
    },

    #[error("`{program}` was cancelled")]
    Cancelled { program: String },
}

impl ChildError {
    /// Exit code of a child that exited on its own.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ChildError::Exited { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Errors from the line stamper.
#[derive(Debug, Error)]
pub enum StampError {
    #[error("reading input: {0}")]
    Read(#[source] std::io::Error),

    #[error("writing output: {0}")]
    Write(#[source] std::io::Error),
}

/// Errors while draining a child stream into staging.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("reading {stream}: {source}")]
    Read {
        stream: StreamKind,
        source: std::io::Error,
    },

    #[error("writing {stream} to staging: {source}")]
    Write {
        stream: StreamKind,
        source: std::io::Error,
    },

    #[error("stamping {stream}: {source}")]
    Stamp {
        stream: StreamKind,
        source: StampError,
    },

    #[error("{stream} closed before end of stream")]
    Closed { stream: StreamKind },

    #[error("{stream} capture task exited without reporting")]
    Lost { stream: StreamKind },
}

/// Errors publishing an artifact.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("reading staged content: {0}")]
    Staging(#[source] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}
