// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Anonymous on-disk staging for captured streams.

use std::io::SeekFrom;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncSeekExt, AsyncWrite, AsyncWriteExt, ReadBuf};

/// A temporary file with no name on disk.
///
/// Unlinked at creation, so the space is reclaimed when the buffer is
/// dropped even if the process dies mid-run.
#[derive(Debug)]
pub struct StagingBuffer {
    file: File,
}

impl StagingBuffer {
    /// Create a buffer in `dir`, or in the system temp dir when `None`.
    pub fn create(dir: Option<&Path>) -> std::io::Result<Self> {
        let file = match dir {
            Some(dir) => tempfile::tempfile_in(dir)?,
            None => tempfile::tempfile()?,
        };
        Ok(Self { file: File::from_std(file) })
    }

    /// Bytes written so far. Flushes pending writes first.
    pub async fn len(&mut self) -> std::io::Result<u64> {
        self.file.flush().await?;
        Ok(self.file.metadata().await?.len())
    }

    pub async fn is_empty(&mut self) -> std::io::Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Flush and move back to the start for reading.
    pub async fn rewind(&mut self) -> std::io::Result<()> {
        self.file.flush().await?;
        self.file.seek(SeekFrom::Start(0)).await?;
        Ok(())
    }
}

impl AsyncRead for StagingBuffer {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.file).poll_read(cx, buf)
    }
}

impl AsyncWrite for StagingBuffer {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        Pin::new(&mut self.file).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.file).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.file).poll_shutdown(cx)
    }
}

#[cfg(test)]
#[path = "staging_tests.rs"]
mod tests;
