// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Endpoint-scheme dispatch between the concrete stores.

use async_trait::async_trait;
use s3io_core::{ContentType, ObjectPath, Visibility};
use tokio::io::AsyncRead;

use crate::{FsStore, HttpStore, ObjectReader, ObjectStore, StoreError};

/// A store chosen at runtime from the endpoint URL.
///
/// - `http://…` → [`HttpStore`]
/// - `file://…` → [`FsStore`]
#[derive(Clone, Debug)]
pub enum StoreRouter {
    Http(HttpStore),
    Fs(FsStore),
}

impl StoreRouter {
    pub fn open(endpoint: &str, bucket: &str) -> Result<Self, StoreError> {
        if endpoint.starts_with("file://") {
            FsStore::from_endpoint(endpoint, bucket).map(StoreRouter::Fs)
        } else {
            HttpStore::new(endpoint, bucket).map(StoreRouter::Http)
        }
    }
}

#[async_trait]
impl ObjectStore for StoreRouter {
    fn endpoint(&self) -> &str {
        match self {
            StoreRouter::Http(s) => s.endpoint(),
            StoreRouter::Fs(s) => s.endpoint(),
        }
    }

    fn bucket(&self) -> &str {
        match self {
            StoreRouter::Http(s) => s.bucket(),
            StoreRouter::Fs(s) => s.bucket(),
        }
    }

    fn with_bucket(&self, bucket: &str) -> Self {
        match self {
            StoreRouter::Http(s) => StoreRouter::Http(s.with_bucket(bucket)),
            StoreRouter::Fs(s) => StoreRouter::Fs(s.with_bucket(bucket)),
        }
    }

    async fn put(
        &self,
        path: &ObjectPath,
        body: Vec<u8>,
        content_type: ContentType,
        visibility: Visibility,
    ) -> Result<(), StoreError> {
        match self {
            StoreRouter::Http(s) => s.put(path, body, content_type, visibility).await,
            StoreRouter::Fs(s) => s.put(path, body, content_type, visibility).await,
        }
    }

    async fn put_stream(
        &self,
        path: &ObjectPath,
        body: &mut (dyn AsyncRead + Send + Unpin),
        size: u64,
        content_type: ContentType,
        visibility: Visibility,
    ) -> Result<(), StoreError> {
        match self {
            StoreRouter::Http(s) => s.put_stream(path, body, size, content_type, visibility).await,
            StoreRouter::Fs(s) => s.put_stream(path, body, size, content_type, visibility).await,
        }
    }

    async fn get_stream(&self, path: &ObjectPath) -> Result<ObjectReader, StoreError> {
        match self {
            StoreRouter::Http(s) => s.get_stream(path).await,
            StoreRouter::Fs(s) => s.get_stream(path).await,
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
