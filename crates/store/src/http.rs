// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-HTTP client for S3-compatible object stores.
//!
//! Speaks just enough HTTP/1.1 over a `TcpStream` to PUT and GET objects in
//! path-style addressing (`<endpoint>/<bucket>/<key>`). Requests are
//! unauthenticated and sent with `Connection: close`, one connection per
//! request. TLS is left to a local proxy.

use async_trait::async_trait;
use s3io_core::{ContentType, ObjectPath, Visibility};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::{ObjectReader, ObjectStore, StoreError};

/// Upper bound on how much of an error response body is kept for messages.
const ERROR_BODY_LIMIT: u64 = 4096;

/// Object store reached over plain HTTP.
#[derive(Clone, Debug)]
pub struct HttpStore {
    endpoint: String,
    /// `host:port` to connect to.
    addr: String,
    /// Value of the `Host` header.
    host: String,
    /// Path prefix from the endpoint URL, without trailing slash.
    base_path: String,
    bucket: String,
}

impl HttpStore {
    /// Create a store for `bucket` at an `http://host[:port][/prefix]` endpoint.
    pub fn new(endpoint: &str, bucket: &str) -> Result<Self, StoreError> {
        let invalid = |reason: &str| StoreError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        };

        if endpoint.starts_with("https://") {
            return Err(invalid("https is not supported; front the store with a local proxy"));
        }
        let rest = endpoint.strip_prefix("http://").ok_or_else(|| invalid("expected http:// scheme"))?;
        let (host, base_path) = match rest.split_once('/') {
            Some((host, path)) => (host, path.trim_matches('/')),
            None => (rest, ""),
        };
        if host.is_empty() {
            return Err(invalid("missing host"));
        }
        if bucket.is_empty() || bucket.contains('/') {
            return Err(invalid("bucket name must be a single non-empty segment"));
        }
        let addr = if host.contains(':') { host.to_string() } else { format!("{}:80", host) };

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            addr,
            host: host.to_string(),
            base_path: base_path.to_string(),
            bucket: bucket.to_string(),
        })
    }

    /// Request target for an object, percent-encoded.
    fn target(&self, path: &ObjectPath) -> String {
        let mut target = String::new();
        if !self.base_path.is_empty() {
            target.push('/');
            target.push_str(&self.base_path);
        }
        target.push('/');
        target.push_str(&encode_path(&self.bucket));
        target.push('/');
        target.push_str(&encode_path(path.as_str()));
        target
    }

    async fn connect(&self) -> Result<TcpStream, StoreError> {
        Ok(TcpStream::connect(&self.addr).await?)
    }

    fn put_head(
        &self,
        path: &ObjectPath,
        size: u64,
        content_type: ContentType,
        visibility: Visibility,
    ) -> String {
        format!(
            "PUT {} HTTP/1.1\r\nHost: {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nx-amz-acl: {}\r\nConnection: close\r\n\r\n",
            self.target(path),
            self.host,
            content_type,
            size,
            visibility
        )
    }
}

#[async_trait]
impl ObjectStore for HttpStore {
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
        let mut stream = self.connect().await?;
        let head = self.put_head(path, size, content_type, visibility);
        stream.write_all(head.as_bytes()).await?;

        let sent = tokio::io::copy(&mut body.take(size), &mut stream).await?;
        if sent != size {
            return Err(StoreError::ShortBody { expected: size, actual: sent });
        }
        stream.flush().await?;

        let mut reader = BufReader::new(stream);
        let response = read_response_head(&mut reader).await?;
        tracing::debug!(
            bucket = %self.bucket,
            key = %path,
            bytes = size,
            status = response.status,
            "PUT complete"
        );
        if !response.is_success() {
            let body = read_error_body(&mut reader).await;
            return Err(StoreError::Http { status: response.status, body });
        }
        Ok(())
    }

    async fn get_stream(&self, path: &ObjectPath) -> Result<ObjectReader, StoreError> {
        let mut stream = self.connect().await?;
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            self.target(path),
            self.host
        );
        stream.write_all(request.as_bytes()).await?;

        let mut reader = BufReader::new(stream);
        let response = read_response_head(&mut reader).await?;
        if response.status == 404 {
            return Err(StoreError::NotFound(self.uri(path)));
        }
        if !response.is_success() {
            let body = read_error_body(&mut reader).await;
            return Err(StoreError::Http { status: response.status, body });
        }
        if response.header("transfer-encoding").is_some_and(|v| v.eq_ignore_ascii_case("chunked")) {
            return Err(StoreError::Protocol("chunked responses are not supported".into()));
        }

        match response.content_length() {
            Some(len) => Ok(Box::new(reader.take(len))),
            None => Ok(Box::new(reader)),
        }
    }
}

/// Status line and headers of an HTTP response.
#[derive(Debug)]
pub(crate) struct ResponseHead {
    pub(crate) status: u16,
    /// Header names lowercased.
    pub(crate) headers: Vec<(String, String)>,
}

impl ResponseHead {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    fn content_length(&self) -> Option<u64> {
        self.header("content-length").and_then(|v| v.parse().ok())
    }
}

/// Read the status line and headers, leaving the reader at the body.
pub(crate) async fn read_response_head<R>(reader: &mut R) -> Result<ResponseHead, StoreError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Err(StoreError::Protocol("connection closed before response".into()));
    }
    let status = line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| StoreError::Protocol(format!("bad status line: {}", line.trim_end())))?;

    let mut headers = Vec::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Err(StoreError::Protocol("connection closed inside headers".into()));
        }
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some((name, value)) = trimmed.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    Ok(ResponseHead { status, headers })
}

/// Best-effort read of an error body for diagnostics.
async fn read_error_body<R>(reader: &mut R) -> String
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let _ = reader.take(ERROR_BODY_LIMIT).read_to_end(&mut buf).await;
    String::from_utf8_lossy(&buf).trim().to_string()
}

/// Percent-encode an object key, keeping `/` separators.
pub(crate) fn encode_path(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
