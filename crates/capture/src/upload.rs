// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publishing staged artifacts and the metadata document.

use s3io_core::{ContentType, ObjectPath, StreamKind, Visibility};
use s3io_store::ObjectStore;
use tokio::sync::oneshot;
use tracing::{Instrument, Span};

use crate::{StagingBuffer, UploadError};

/// What became of one stream artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    /// Published at this URI.
    Published(String),
    /// Nothing was captured, so nothing was published.
    Empty,
    /// Not published; the reason is recorded in the metadata.
    Failed(String),
}

/// Moves staged content into the object store, world-readable.
#[derive(Clone, Debug)]
pub struct ArtifactUploader<S> {
    store: S,
}

impl<S: ObjectStore> ArtifactUploader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Upload the whole of `buffer` as plain text.
    ///
    /// Returns `None` without touching the store when the buffer is empty;
    /// object stores reject zero-length puts.
    pub async fn upload(
        &self,
        buffer: &mut StagingBuffer,
        path: &ObjectPath,
    ) -> Result<Option<String>, UploadError> {
        let size = buffer.len().await.map_err(UploadError::Staging)?;
        if size == 0 {
            return Ok(None);
        }
        buffer.rewind().await.map_err(UploadError::Staging)?;
        self.store
            .put_stream(path, buffer, size, ContentType::TextPlain, Visibility::PublicRead)
            .await?;
        Ok(Some(self.store.uri(path)))
    }

    /// Publish an in-memory document.
    pub async fn publish(
        &self,
        path: &ObjectPath,
        body: Vec<u8>,
        content_type: ContentType,
    ) -> Result<String, UploadError> {
        self.store.put(path, body, content_type, Visibility::PublicRead).await?;
        Ok(self.store.uri(path))
    }

    /// Upload `buffer` in the background, reporting on the returned channel.
    pub fn spawn(
        &self,
        stream: StreamKind,
        mut buffer: StagingBuffer,
        path: ObjectPath,
        parent: &Span,
    ) -> oneshot::Receiver<ArtifactOutcome> {
        let (tx, rx) = oneshot::channel();
        let uploader = self.clone();
        let span = tracing::debug_span!(parent: parent, "upload", %stream, key = %path);
        tokio::spawn(
            async move {
                let outcome = match uploader.upload(&mut buffer, &path).await {
                    Ok(Some(uri)) => {
                        tracing::info!(%uri, "published");
                        ArtifactOutcome::Published(uri)
                    }
                    Ok(None) => {
                        tracing::debug!("nothing captured, skipping upload");
                        ArtifactOutcome::Empty
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "upload failed");
                        ArtifactOutcome::Failed(e.to_string())
                    }
                };
                let _ = tx.send(outcome);
            }
            .instrument(span),
        );
        rx
    }
}

#[cfg(test)]
#[path = "upload_tests.rs"]
mod tests;
