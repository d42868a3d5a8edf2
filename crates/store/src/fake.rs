// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory object store for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use s3io_core::{ContentType, ObjectPath, Visibility};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{ObjectReader, ObjectStore, StoreError};

pub const FAKE_ENDPOINT: &str = "http://fake.store";

/// An object held by the fake store.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: ContentType,
    pub visibility: Visibility,
}

/// Recorded put attempt, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutCall {
    pub bucket: String,
    pub key: String,
    pub size: u64,
}

#[derive(Default)]
struct FakeStoreState {
    objects: HashMap<(String, String), StoredObject>,
    puts: Vec<PutCall>,
    /// Keys whose puts fail, with the error body to report.
    failures: HashMap<String, String>,
    put_delay: Duration,
    in_flight: usize,
    max_in_flight: usize,
}

/// Fake object store for testing.
///
/// Rejects empty objects the way S3 does, so callers must skip them.
#[derive(Clone)]
pub struct FakeStore {
    inner: Arc<Mutex<FakeStoreState>>,
    bucket: String,
}

impl Default for FakeStore {
    fn default() -> Self {
        Self::new("logs")
    }
}

impl FakeStore {
    pub fn new(bucket: &str) -> Self {
        Self { inner: Arc::new(Mutex::new(FakeStoreState::default())), bucket: bucket.to_string() }
    }

    /// Make every put to `key` fail with HTTP 503.
    pub fn fail_key(&self, key: &str, message: &str) {
        self.inner.lock().failures.insert(key.to_string(), message.to_string());
    }

    /// Hold each put open for `delay` before completing it.
    pub fn set_put_delay(&self, delay: Duration) {
        self.inner.lock().put_delay = delay;
    }

    /// Seed an object in this store's bucket.
    pub fn insert(&self, key: &str, body: &[u8]) {
        self.inner.lock().objects.insert(
            (self.bucket.clone(), key.to_string()),
            StoredObject {
                body: body.to_vec(),
                content_type: ContentType::TextPlain,
                visibility: Visibility::PublicRead,
            },
        );
    }

    /// Object at `key` in this store's bucket.
    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.inner.lock().objects.get(&(self.bucket.clone(), key.to_string())).cloned()
    }

    /// Keys present in this store's bucket, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .inner
            .lock()
            .objects
            .keys()
            .filter(|(bucket, _)| *bucket == self.bucket)
            .map(|(_, key)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// All put attempts in order.
    pub fn puts(&self) -> Vec<PutCall> {
        self.inner.lock().puts.clone()
    }

    /// Highest number of puts observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.inner.lock().max_in_flight
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    fn endpoint(&self) -> &str {
        FAKE_ENDPOINT
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn with_bucket(&self, bucket: &str) -> Self {
        Self { inner: Arc::clone(&self.inner), bucket: bucket.to_string() }
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
        let key = path.as_str().to_string();
        let (delay, failure) = {
            let mut state = self.inner.lock();
            state.puts.push(PutCall { bucket: self.bucket.clone(), key: key.clone(), size });
            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);
            (state.put_delay, state.failures.get(&key).cloned())
        };

        let result = async {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if let Some(message) = failure {
                return Err(StoreError::Http { status: 503, body: message });
            }
            if size == 0 {
                return Err(StoreError::EmptyObject(key.clone()));
            }
            let mut buf = Vec::new();
            body.take(size).read_to_end(&mut buf).await?;
            if buf.len() as u64 != size {
                return Err(StoreError::ShortBody { expected: size, actual: buf.len() as u64 });
            }
            Ok(buf)
        }
        .await;

        let mut state = self.inner.lock();
        state.in_flight -= 1;
        let buf = result?;
        state.objects.insert(
            (self.bucket.clone(), key),
            StoredObject { body: buf, content_type, visibility },
        );
        Ok(())
    }

    async fn get_stream(&self, path: &ObjectPath) -> Result<ObjectReader, StoreError> {
        let body = self
            .object(path.as_str())
            .map(|o| o.body)
            .ok_or_else(|| StoreError::NotFound(self.uri(path)))?;
        Ok(Box::new(std::io::Cursor::new(body)))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
