// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background tasks that drain a child stream into a staging buffer.
//!
//! Each capture reports exactly once on a oneshot channel. The buffer is
//! handed back with the outcome so the uploader can take ownership of it.

use s3io_core::{Clock, StreamKind};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};

use crate::{CaptureError, LineStamper, StagingBuffer};

const COPY_CAPACITY: usize = 64 * 1024;
const PIPE_CAPACITY: usize = 64 * 1024;

/// Result of draining one stream.
#[derive(Debug)]
pub struct CaptureOutcome {
    pub stream: StreamKind,
    pub buffer: StagingBuffer,
    /// Bytes written to the buffer.
    pub bytes: u64,
    pub error: Option<CaptureError>,
}

/// Spawns the capture task for one child stream.
///
/// `teardown` abandons the stream before end of file, for children whose
/// descendants keep the pipe open after the child itself has exited.
pub struct StreamCapture {
    stream: StreamKind,
    teardown: CancellationToken,
    span: Span,
}

impl StreamCapture {
    pub fn new(stream: StreamKind, teardown: CancellationToken) -> Self {
        let span = tracing::debug_span!("capture", %stream);
        Self { stream, teardown, span }
    }

    /// Parent the task's span under `parent` instead of the current span.
    pub fn with_span(mut self, parent: &Span) -> Self {
        self.span = tracing::debug_span!(parent: parent, "capture", stream = %self.stream);
        self
    }

    /// Copy `source` into `buffer` byte for byte.
    pub fn raw<R>(self, source: R, mut buffer: StagingBuffer) -> oneshot::Receiver<CaptureOutcome>
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let stream = self.stream;
        let teardown = self.teardown.clone();
        self.spawn(async move {
            let mut source = source;
            let (bytes, error) = drain(stream, &mut source, &mut buffer, &teardown).await;
            CaptureOutcome { stream, buffer, bytes, error }
        })
    }

    /// Copy `source` into `buffer` with every line timestamped.
    pub fn stamped<R, C>(
        self,
        source: R,
        mut buffer: StagingBuffer,
        stamper: LineStamper<C>,
    ) -> oneshot::Receiver<CaptureOutcome>
    where
        R: AsyncRead + Send + Unpin + 'static,
        C: Clock,
    {
        let stream = self.stream;
        let teardown = self.teardown.clone();
        self.spawn(async move {
            let (tx, mut rx) = tokio::io::duplex(PIPE_CAPACITY);

            // Dropping `tx` on teardown ends the pipe for the copy side.
            let stamp = async {
                tokio::select! {
                    result = stamper.stamp(source, tx) => {
                        result.err().map(|source| CaptureError::Stamp { stream, source })
                    }
                    _ = teardown.cancelled() => Some(CaptureError::Closed { stream }),
                }
            };
            let copy = drain(stream, &mut rx, &mut buffer, &teardown);

            let (stamp_error, (bytes, copy_error)) = tokio::join!(stamp, copy);
            CaptureOutcome { stream, buffer, bytes, error: stamp_error.or(copy_error) }
        })
    }

    fn spawn<F>(self, work: F) -> oneshot::Receiver<CaptureOutcome>
    where
        F: std::future::Future<Output = CaptureOutcome> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(
            async move {
                let outcome = work.await;
                match &outcome.error {
                    None => tracing::debug!(bytes = outcome.bytes, "stream captured"),
                    Some(e) => tracing::warn!(bytes = outcome.bytes, error = %e, "capture failed"),
                }
                // The run may have stopped listening; the buffer is dropped with it.
                let _ = tx.send(outcome);
            }
            .instrument(self.span),
        );
        rx
    }
}

/// Copy until end of file, returning the bytes written and the first error.
///
/// A staging write failure does not stop the read side: the source keeps
/// being drained so the child never blocks on a full pipe.
async fn drain<R, W>(
    stream: StreamKind,
    source: &mut R,
    sink: &mut W,
    teardown: &CancellationToken,
) -> (u64, Option<CaptureError>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; COPY_CAPACITY];
    let mut bytes = 0u64;
    let mut error = None;

    loop {
        let n = tokio::select! {
            biased;
            _ = teardown.cancelled() => {
                return (bytes, error.or(Some(CaptureError::Closed { stream })));
            }
            read = source.read(&mut buf) => match read {
                Ok(0) => break,
                Ok(n) => n,
                Err(source) => return (bytes, error.or(Some(CaptureError::Read { stream, source }))),
            },
        };

        if error.is_some() {
            continue;
        }
        match sink.write_all(&buf[..n]).await {
            Ok(()) => bytes += n as u64,
            Err(source) => error = Some(CaptureError::Write { stream, source }),
        }
    }

    if error.is_none() {
        if let Err(source) = sink.flush().await {
            error = Some(CaptureError::Write { stream, source });
        }
    }
    (bytes, error)
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
