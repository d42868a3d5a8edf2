// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! s3io-core: data model shared by the s3io capture pipeline, stores, and CLI

pub mod macros;

pub mod clock;
pub mod metadata;
pub mod object;
pub mod timestamp;

pub use clock::{Clock, FakeClock, SystemClock};
pub use metadata::{ArtifactFailure, RunMetadata, StreamKind};
pub use object::{object_uri, ContentType, ObjectPath, PathError, Visibility};
pub use timestamp::{Timestamp, TimestampError};
