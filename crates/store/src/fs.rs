// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local-directory object store.
//!
//! Buckets are directories under a root; objects are flat files inside the
//! bucket directory. Keys are escaped (`%` → `%25`, `/` → `%2F`) so that an
//! object and a "directory" of objects sharing its prefix (a run's metadata
//! and its `stdout`/`stderr`) can coexist, as they do in a real bucket.
//!
//! Published URIs are logical bucket addresses with the same shape as the
//! HTTP store's (`file://<root>/<bucket>/<key>`), not paths on disk. Use
//! [`FsStore::object_file`] to find the file holding an object.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use s3io_core::{ContentType, ObjectPath, Visibility};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::{ObjectReader, ObjectStore, StoreError};

/// Object store backed by a local directory.
#[derive(Clone, Debug)]
pub struct FsStore {
    root: PathBuf,
    endpoint: String,
    bucket: String,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>, bucket: &str) -> Result<Self, StoreError> {
        let root = root.into();
        if bucket.is_empty() || bucket.contains('/') || bucket == "." || bucket == ".." {
            return Err(StoreError::InvalidEndpoint {
                endpoint: root.display().to_string(),
                reason: format!("invalid bucket name `{}`", bucket),
            });
        }
        let endpoint = format!("file://{}", root.display()).trim_end_matches('/').to_string();
        Ok(Self { root, endpoint, bucket: bucket.to_string() })
    }

    /// Parse a `file://<root>` endpoint.
    pub fn from_endpoint(endpoint: &str, bucket: &str) -> Result<Self, StoreError> {
        let root = endpoint.strip_prefix("file://").filter(|r| !r.is_empty()).ok_or_else(|| {
            StoreError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: "expected file://<directory>".to_string(),
            }
        })?;
        Self::new(root, bucket)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the object at `path`.
    pub fn object_file(&self, path: &ObjectPath) -> PathBuf {
        self.root.join(&self.bucket).join(escape_key(path.as_str()))
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn with_bucket(&self, bucket: &str) -> Self {
        Self { bucket: bucket.to_string(), ..self.clone() }
    }

    async fn put(
        &self,
        path: &ObjectPath,
        body: Vec<u8>,
        content_type: ContentType,
        visibility: Visibility,
    ) -> Result<(), StoreError> {
        let size = body.len() as u64;
        let mut reader = body.as_slice();
        self.put_stream(path, &mut reader, size, content_type, visibility).await
    }

    async fn put_stream(
        &self,
        path: &ObjectPath,
        body: &mut (dyn AsyncRead + Send + Unpin),
        size: u64,
        content_type: ContentType,
        visibility: Visibility,
    ) -> Result<(), StoreError> {
        let dest = self.object_file(path);
        let dir = self.root.join(&self.bucket);
        tokio::fs::create_dir_all(&dir).await?;

        // Write beside the destination and rename so readers never see a
        // partial object.
        let partial = dir.join(format!(".{}.partial", escape_key(path.as_str())));
        let mut file = tokio::fs::File::create(&partial).await?;
        let written = tokio::io::copy(&mut body.take(size), &mut file).await;
        let written = match written {
            Ok(n) => n,
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e.into());
            }
        };
        if written != size {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(StoreError::ShortBody { expected: size, actual: written });
        }
        file.flush().await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&partial, &dest).await?;

        tracing::debug!(
            file = %dest.display(),
            bytes = size,
            %content_type,
            %visibility,
            "stored object"
        );
        Ok(())
    }

    async fn get_stream(&self, path: &ObjectPath) -> Result<ObjectReader, StoreError> {
        match tokio::fs::File::open(self.object_file(path)).await {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(self.uri(path)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Flatten a key into a single file name.
pub fn escape_key(key: &str) -> String {
    key.replace('%', "%25").replace('/', "%2F")
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
