// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The object store seam used by the capture pipeline.

use async_trait::async_trait;
use s3io_core::{object_uri, ContentType, ObjectPath, Visibility};
use tokio::io::AsyncRead;

use crate::StoreError;

/// A readable object body returned by [`ObjectStore::get_stream`].
pub type ObjectReader = Box<dyn AsyncRead + Send + Unpin>;

/// Adapter for a bucket in a remote object store.
///
/// Implementations are cheap to clone and safe to share between the
/// concurrent upload tasks of a run.
#[async_trait]
pub trait ObjectStore: Clone + Send + Sync + 'static {
    /// Base URL objects are published under, without a trailing slash.
    fn endpoint(&self) -> &str;

    fn bucket(&self) -> &str;

    /// The same store, addressing a different bucket.
    fn with_bucket(&self, bucket: &str) -> Self;

    /// Public URI of `path` in this bucket.
    fn uri(&self, path: &ObjectPath) -> String {
        object_uri(self.endpoint(), self.bucket(), path)
    }

    /// Store a complete in-memory body.
    async fn put(
        &self,
        path: &ObjectPath,
        body: Vec<u8>,
        content_type: ContentType,
        visibility: Visibility,
    ) -> Result<(), StoreError>;

    /// Store exactly `size` bytes read from `body`.
    async fn put_stream(
        &self,
        path: &ObjectPath,
        body: &mut (dyn AsyncRead + Send + Unpin),
        size: u64,
        content_type: ContentType,
        visibility: Visibility,
    ) -> Result<(), StoreError>;

    /// Open an object for sequential reading.
    async fn get_stream(&self, path: &ObjectPath) -> Result<ObjectReader, StoreError>;
}
