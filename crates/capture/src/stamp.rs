// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line stamping: `<timestamp> <line>\n` for every line of a byte stream.
//!
//! Lines are streamed through rather than collected, so memory use is bounded
//! by the read buffer no matter how long a line is. The timestamp is taken
//! when the first byte of the line is read.

use s3io_core::Clock;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::StampError;

const READ_CAPACITY: usize = 8 * 1024;

/// Prefixes each newline-delimited line with the current UTC time.
///
/// - `\n` and `\r\n` both end a line; the terminator is replaced by `\n`.
/// - A final line without a terminator still gets one, also when reading
///   fails partway through it.
/// - Empty input produces empty output.
#[derive(Clone, Debug)]
pub struct LineStamper<C> {
    clock: C,
}

impl<C: Clock> LineStamper<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Stamp `input` into `output` until end of input, returning the number of
    /// lines written.
    ///
    /// `output` is shut down on every exit path so a reader on the other side
    /// sees end of stream.
    pub async fn stamp<R, W>(&self, input: R, mut output: W) -> Result<u64, StampError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let result = self.stamp_lines(input, &mut output).await;
        let closed = output.shutdown().await.map_err(StampError::Write);
        let lines = result?;
        closed?;
        Ok(lines)
    }

    async fn stamp_lines<R, W>(&self, input: R, output: &mut W) -> Result<u64, StampError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = BufReader::with_capacity(READ_CAPACITY, input);
        let mut lines = 0u64;
        let mut in_line = false;
        // A `\r` at the end of a chunk, held back until we know whether a
        // `\n` follows it.
        let mut pending_cr = false;

        loop {
            let chunk = match reader.fill_buf().await {
                Ok(chunk) => chunk,
                Err(e) => {
                    // Terminate the open line so the output stays line-shaped.
                    finish_line(output, in_line, pending_cr).await?;
                    return Err(StampError::Read(e));
                }
            };
            if chunk.is_empty() {
                break;
            }

            if !in_line {
                let prefix = format!("{} ", self.clock.now());
                write(output, prefix.as_bytes()).await?;
                in_line = true;
                lines += 1;
            }

            let (content, consumed, line_done) = match chunk.iter().position(|&b| b == b'\n') {
                Some(i) => (&chunk[..i], i + 1, true),
                None => (chunk, chunk.len(), false),
            };

            if pending_cr && !(line_done && content.is_empty()) {
                write(output, b"\r").await?;
            }

            let (body, hold_cr) = match content.strip_suffix(&[b'\r']) {
                Some(stripped) => (stripped, !line_done),
                None => (content, false),
            };
            write(output, body).await?;
            if line_done {
                write(output, b"\n").await?;
                in_line = false;
            }
            pending_cr = hold_cr;
            reader.consume(consumed);
        }

        finish_line(output, in_line, pending_cr).await?;
        Ok(lines)
    }
}

async fn finish_line<W: AsyncWrite + Unpin>(
    output: &mut W,
    in_line: bool,
    pending_cr: bool,
) -> Result<(), StampError> {
    if in_line {
        if pending_cr {
            write(output, b"\r").await?;
        }
        write(output, b"\n").await?;
    }
    Ok(())
}

async fn write<W: AsyncWrite + Unpin>(output: &mut W, bytes: &[u8]) -> Result<(), StampError> {
    output.write_all(bytes).await.map_err(StampError::Write)
}

#[cfg(test)]
#[path = "stamp_tests.rs"]
mod tests;
