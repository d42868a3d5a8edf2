// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The metadata document published at the root of each run directory.

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// One of the two captured child streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    /// Object key beneath the run directory.
    pub fn sub_path(&self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

crate::simple_display! {
    StreamKind {
        Stdout => "stdout",
        Stderr => "stderr",
    }
}

/// A stream whose artifact could not be captured or published.
///
/// An unset URI with no failure means the stream was silent. A failure next
/// to a set URI means the published artifact is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFailure {
    pub artifact: StreamKind,
    pub error: String,
}

/// Record of a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub program: String,
    pub arguments: Vec<String>,
    pub start: Timestamp,
    pub finish: Timestamp,
    #[serde(rename = "stdoutURI", default, skip_serializing_if = "Option::is_none")]
    pub stdout_uri: Option<String>,
    #[serde(rename = "stderrURI", default, skip_serializing_if = "Option::is_none")]
    pub stderr_uri: Option<String>,
    #[serde(rename = "selfURI")]
    pub self_uri: String,
    /// Exit code when the child exited normally.
    #[serde(rename = "exitCode", default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Terminating signal when the child was killed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ArtifactFailure>,
}

impl RunMetadata {
    pub fn uri(&self, kind: StreamKind) -> Option<&str> {
        match kind {
            StreamKind::Stdout => self.stdout_uri.as_deref(),
            StreamKind::Stderr => self.stderr_uri.as_deref(),
        }
    }

    pub fn failure(&self, kind: StreamKind) -> Option<&ArtifactFailure> {
        self.failures.iter().find(|f| f.artifact == kind)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
