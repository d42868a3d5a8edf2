// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The run orchestrator.
//!
//! A run moves through `spawn → capture → upload → publish` exactly once:
//!
//! 1. Stage: record the start time and create both staging buffers.
//! 2. Spawn the child and start the two capture tasks against its pipes.
//! 3. Barrier: wait for the child to exit and both captures to reach end of
//!    stream. The two are awaited independently.
//! 4. Upload both buffers concurrently. Barrier again.
//! 5. Publish the metadata document, whatever happened above.
//!
//! Each phase hands off through its own oneshot channel per stream, so a
//! signal can never be mistaken for one from the other phase.

use std::path::PathBuf;
use std::time::Duration;

use s3io_core::{ArtifactFailure, Clock, ContentType, ObjectPath, RunMetadata, StreamKind, SystemClock};
use s3io_store::ObjectStore;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};

use crate::{
    ArtifactOutcome, ArtifactUploader, CaptureError, CaptureOutcome, ChildError, CommandRunner,
    LineStamper, RunError, StagingBuffer, StreamCapture,
};

/// Default time a cancelled child gets between SIGTERM and SIGKILL.
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(5);

/// Tunables for a [`Run`].
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory for staging buffers; the system temp dir when unset.
    pub staging_dir: Option<PathBuf>,
    /// After cancellation: how long the child has to exit after SIGTERM, and
    /// then how long its streams have to reach end of file.
    pub kill_grace: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { staging_dir: None, kill_grace: DEFAULT_KILL_GRACE }
    }
}

impl RunOptions {
    s3io_core::setters! {
        set { kill_grace: Duration }
        option { staging_dir: PathBuf }
    }
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunReport {
    /// The metadata as assembled, whether or not it was published.
    pub metadata: RunMetadata,
    /// The child's own outcome.
    pub child: Result<(), ChildError>,
    pub metadata_published: bool,
}

/// One invocation of a command with its output published to a store.
pub struct Run<S, C = SystemClock> {
    uploader: ArtifactUploader<S>,
    run_dir: ObjectPath,
    command: CommandRunner,
    clock: C,
    options: RunOptions,
    span: Span,
}

impl<S: ObjectStore> Run<S, SystemClock> {
    /// Artifacts are published under `run_dir`: `stdout`, `stderr`, and the
    /// metadata document at `run_dir` itself.
    pub fn new(store: S, run_dir: ObjectPath, command: CommandRunner) -> Self {
        let span = tracing::info_span!("run", program = %command.program(), run_dir = %run_dir);
        Self {
            uploader: ArtifactUploader::new(store),
            run_dir,
            command,
            clock: SystemClock,
            options: RunOptions::default(),
            span,
        }
    }
}

impl<S: ObjectStore, C: Clock> Run<S, C> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Run<S, C2> {
        Run {
            uploader: self.uploader,
            run_dir: self.run_dir,
            command: self.command,
            clock,
            options: self.options,
            span: self.span,
        }
    }

    pub fn options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Log under `span` instead of the default `run` span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Run to completion with no way to cancel.
    pub async fn execute(self) -> Result<RunReport, RunError> {
        self.execute_until(CancellationToken::new()).await
    }

    /// Run until the child exits or `cancel` fires.
    ///
    /// On cancellation the child is terminated and whatever it wrote is
    /// still uploaded and described; the child's result is
    /// [`ChildError::Cancelled`].
    ///
    /// `Err` means the run could not be set up and nothing was published.
    pub async fn execute_until(self, cancel: CancellationToken) -> Result<RunReport, RunError> {
        let span = self.span.clone();
        self.drive(cancel).instrument(span).await
    }

    async fn drive(self, cancel: CancellationToken) -> Result<RunReport, RunError> {
        let Run { uploader, run_dir, command, clock, options, span } = self;
        let stdout_path = run_dir.join(StreamKind::Stdout.sub_path())?;
        let stderr_path = run_dir.join(StreamKind::Stderr.sub_path())?;

        let start = clock.now();
        let staging_dir = options.staging_dir.as_deref();
        let stdout_buffer = StagingBuffer::create(staging_dir).map_err(RunError::Staging)?;
        let stderr_buffer = StagingBuffer::create(staging_dir).map_err(RunError::Staging)?;

        let program = command.program().to_string();
        let mut metadata = RunMetadata {
            program: program.clone(),
            arguments: command.args().to_vec(),
            start,
            finish: start,
            stdout_uri: None,
            stderr_uri: None,
            self_uri: uploader.store().uri(&run_dir),
            exit_code: None,
            signal: None,
            failures: Vec::new(),
        };

        let mut running = match command.start() {
            Ok(running) => running,
            Err(e) => {
                tracing::warn!(error = %e, "child failed to start");
                let metadata_published = publish(&uploader, &run_dir, &clock, &mut metadata).await;
                return Ok(RunReport { metadata, child: Err(e), metadata_published });
            }
        };
        tracing::debug!(pid = running.id(), "child started");

        let stdout = running.take_stdout().ok_or(RunError::MissingStream(StreamKind::Stdout))?;
        let stderr = running.take_stderr().ok_or(RunError::MissingStream(StreamKind::Stderr))?;

        let teardown = CancellationToken::new();
        let stdout_done = StreamCapture::new(StreamKind::Stdout, teardown.clone())
            .with_span(&span)
            .raw(stdout, stdout_buffer);
        let stderr_done = StreamCapture::new(StreamKind::Stderr, teardown.clone())
            .with_span(&span)
            .stamped(stderr, stderr_buffer, LineStamper::new(clock.clone()));

        let waited = tokio::select! {
            exit = running.wait() => Some(exit),
            _ = cancel.cancelled() => None,
        };
        let (exit, cancelled) = match waited {
            Some(exit) => (exit, false),
            None => {
                tracing::info!(grace = ?options.kill_grace, "cancelled, terminating child");
                (running.terminate(options.kill_grace).await, true)
            }
        };
        match &exit {
            Ok(info) => tracing::debug!(code = info.code, signal = info.signal, "child exited"),
            Err(e) => tracing::warn!(error = %e, "lost track of child"),
        }

        // Streams drain to end of file. Once cancelled, descendants that keep
        // a pipe open get one more grace period before it is abandoned.
        let watchdog = {
            let cancel = cancel.clone();
            let teardown = teardown.clone();
            let grace = options.kill_grace;
            tokio::spawn(async move {
                cancel.cancelled().await;
                tokio::time::sleep(grace).await;
                teardown.cancel();
            })
        };
        let (stdout_capture, stderr_capture) = tokio::join!(stdout_done, stderr_done);
        watchdog.abort();
        tracing::debug!("capture complete");

        let stdout_buffer = settle_capture(StreamKind::Stdout, stdout_capture, &mut metadata);
        let stderr_buffer = settle_capture(StreamKind::Stderr, stderr_capture, &mut metadata);

        let stdout_upload =
            stdout_buffer.map(|buffer| uploader.spawn(StreamKind::Stdout, buffer, stdout_path, &span));
        let stderr_upload =
            stderr_buffer.map(|buffer| uploader.spawn(StreamKind::Stderr, buffer, stderr_path, &span));
        let (stdout_outcome, stderr_outcome) =
            tokio::join!(upload_outcome(stdout_upload), upload_outcome(stderr_upload));
        tracing::debug!("upload complete");

        record_upload(StreamKind::Stdout, stdout_outcome, &mut metadata);
        record_upload(StreamKind::Stderr, stderr_outcome, &mut metadata);

        let child = match exit {
            Ok(info) => {
                metadata.exit_code = info.code;
                metadata.signal = info.signal;
                if cancelled {
                    Err(ChildError::Cancelled { program })
                } else {
                    info.check(&program)
                }
            }
            Err(e) => Err(e),
        };

        let metadata_published = publish(&uploader, &run_dir, &clock, &mut metadata).await;
        Ok(RunReport { metadata, child, metadata_published })
    }
}

/// Record a capture failure and hand back whatever was staged.
fn settle_capture(
    stream: StreamKind,
    received: Result<CaptureOutcome, oneshot::error::RecvError>,
    metadata: &mut RunMetadata,
) -> Option<StagingBuffer> {
    let outcome = match received {
        Ok(outcome) => outcome,
        Err(_) => {
            let error = CaptureError::Lost { stream };
            tracing::warn!(%error, "capture lost");
            metadata.failures.push(ArtifactFailure { artifact: stream, error: error.to_string() });
            return None;
        }
    };
    if let Some(error) = outcome.error {
        // Partial content is still worth publishing.
        metadata.failures.push(ArtifactFailure { artifact: stream, error: error.to_string() });
    }
    Some(outcome.buffer)
}

async fn upload_outcome(
    pending: Option<oneshot::Receiver<ArtifactOutcome>>,
) -> Option<ArtifactOutcome> {
    let rx = pending?;
    Some(
        rx.await
            .unwrap_or_else(|_| ArtifactOutcome::Failed("upload task exited without reporting".into())),
    )
}

fn record_upload(stream: StreamKind, outcome: Option<ArtifactOutcome>, metadata: &mut RunMetadata) {
    let Some(outcome) = outcome else { return };
    match outcome {
        ArtifactOutcome::Published(uri) => match stream {
            StreamKind::Stdout => metadata.stdout_uri = Some(uri),
            StreamKind::Stderr => metadata.stderr_uri = Some(uri),
        },
        ArtifactOutcome::Empty => {}
        ArtifactOutcome::Failed(error) => {
            metadata.failures.push(ArtifactFailure { artifact: stream, error });
        }
    }
}

/// Stamp the finish time and publish the metadata document.
///
/// Returns whether the document made it to the store; failures are logged.
async fn publish<S: ObjectStore, C: Clock>(
    uploader: &ArtifactUploader<S>,
    run_dir: &ObjectPath,
    clock: &C,
    metadata: &mut RunMetadata,
) -> bool {
    metadata.finish = clock.now().max(metadata.start);
    let body = match metadata.to_json() {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize metadata");
            return false;
        }
    };
    match uploader.publish(run_dir, body, ContentType::TextJavascript).await {
        Ok(uri) => {
            tracing::info!(%uri, "metadata published");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to publish metadata");
            false
        }
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
