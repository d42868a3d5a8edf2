// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! s3io-capture: run a command, stage its output, and publish it

mod capture;
mod command;
mod error;
mod run;
mod stamp;
mod staging;
mod upload;

pub use capture::{CaptureOutcome, StreamCapture};
pub use command::{CommandRunner, ExitInfo, RunningCommand, StdinSource};
pub use error::{CaptureError, ChildError, RunError, StampError, UploadError};
pub use run::{Run, RunOptions, RunReport, DEFAULT_KILL_GRACE};
pub use stamp::LineStamper;
pub use staging::StagingBuffer;
pub use upload::{ArtifactOutcome, ArtifactUploader};
