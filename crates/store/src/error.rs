// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors from object store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid endpoint `{endpoint}`: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("store returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("malformed response: {0}")]
    Protocol(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("refusing to store empty object: {0}")]
    EmptyObject(String),

    #[error("body ended after {actual} of {expected} bytes")]
    ShortBody { expected: u64, actual: u64 },
}
