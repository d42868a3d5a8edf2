// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for specs.

use std::path::Path;

use assert_cmd::Command;
use s3io_core::{ObjectPath, RunMetadata};
use s3io_store::escape_key;

use similar_asserts::assert_eq;

/// A local object store rooted in a temp directory.
pub struct Store {
    dir: tempfile::TempDir,
}

impl Store {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn endpoint(&self) -> String {
        format!("file://{}", self.root().display())
    }

    /// Seed an object, e.g. an input for `--in-path`.
    pub fn put(&self, bucket: &str, key: &str, body: &[u8]) {
        let dir = self.root().join(bucket);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(escape_key(key)), body).unwrap();
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<String> {
        let path = self.root().join(bucket).join(escape_key(key));
        std::fs::read_to_string(path).ok()
    }

    /// Keys present in `bucket`, sorted.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.root().join(bucket)) else {
            return Vec::new();
        };
        let mut keys: Vec<String> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().replace("%2F", "/").replace("%25", "%"))
            .collect();
        keys.sort();
        keys
    }

    pub fn metadata(&self, bucket: &str, run_dir: &str) -> RunMetadata {
        let key = ObjectPath::new(run_dir).unwrap();
        let body = self
            .object(bucket, key.as_str())
            .unwrap_or_else(|| panic!("no metadata at {bucket}/{run_dir}"));
        RunMetadata::from_json(body.as_bytes()).unwrap()
    }

    pub fn uri(&self, bucket: &str, key: &str) -> String {
        format!("{}/{bucket}/{key}", self.endpoint())
    }

    /// `s3io` pointed at this store, writing to bucket `logs`.
    pub fn s3io(&self, run_dir: &str) -> Command {
        let mut cmd = cli();
        cmd.env("S3IO_ENDPOINT", self.endpoint())
            .args(["--out-bucket", "logs", "--out-dir", run_dir]);
        cmd
    }
}

/// The `s3io` binary with a clean environment.
pub fn cli() -> Command {
    let mut cmd = Command::cargo_bin("s3io").unwrap();
    cmd.env_remove("S3IO_ENDPOINT")
        .env_remove("S3IO_STAGING_DIR")
        .env_remove("S3IO_KILL_GRACE_MS")
        .env("S3IO_LOG", "warn");
    cmd
}

/// Captured result of running the binary.
pub struct Outcome {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Outcome {
    pub fn stdout_has(&self, needle: &str) -> &Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(&self, needle: &str) -> &Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}:\n{}", self.stderr);
        self
    }
}

pub trait CommandExt {
    fn outcome(&mut self) -> Outcome;

    /// Run and require exit code 0.
    fn passes(&mut self) -> Outcome {
        self.exits_with(0)
    }

    fn exits_with(&mut self, code: i32) -> Outcome {
        let outcome = self.outcome();
        assert_eq!(
            outcome.code,
            Some(code),
            "unexpected exit\nstdout:\n{}\nstderr:\n{}",
            outcome.stdout,
            outcome.stderr
        );
        outcome
    }
}

impl CommandExt for Command {
    fn outcome(&mut self) -> Outcome {
        let output = self.output().unwrap();
        Outcome {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}
