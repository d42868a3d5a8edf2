// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object-store addressing: keys, content types, and visibility.

use std::fmt;

use thiserror::Error;

/// Errors from building an [`ObjectPath`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("object path must not be empty")]
    Empty,
    #[error("object path segment `{0}` is not allowed")]
    Segment(String),
}

/// A normalized object key: `/`-separated segments, no leading or trailing
/// slash, no empty, `.` or `..` segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectPath(String);

impl ObjectPath {
    pub fn new(raw: &str) -> Result<Self, PathError> {
        let mut segments = Vec::new();
        for seg in raw.split('/') {
            match seg {
                "" => continue,
                "." | ".." => return Err(PathError::Segment(seg.to_string())),
                s => segments.push(s),
            }
        }
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self(segments.join("/")))
    }

    /// Append a relative path beneath this one.
    pub fn join(&self, child: &str) -> Result<Self, PathError> {
        Self::new(&format!("{}/{}", self.0, child))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Public URI of an object: `<endpoint>/<bucket>/<path>`.
pub fn object_uri(endpoint: &str, bucket: &str, path: &ObjectPath) -> String {
    format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, path)
}

/// MIME type attached to a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// Captured stdout and stamped stderr.
    TextPlain,
    /// The metadata document. Kept for compatibility with existing buckets.
    TextJavascript,
}

crate::simple_display! {
    ContentType {
        TextPlain => "text/plain",
        TextJavascript => "text/javascript",
    }
}

/// Canned access policy applied on upload; displays as the `x-amz-acl` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    PublicRead,
}

crate::simple_display! {
    Visibility {
        PublicRead => "public-read",
    }
}

#[cfg(test)]
#[path = "object_tests.rs"]
mod tests;
