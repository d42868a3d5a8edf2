// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end runs against a local store.

use s3io_core::{StreamKind, Timestamp};
use similar_asserts::assert_eq;

use crate::prelude::*;

#[test]
fn echo_publishes_stdout_and_metadata() {
    let store = Store::new();
    let out = store.s3io("runs/1").args(["echo", "hello"]).passes();

    let self_uri = store.uri("logs", "runs/1");
    assert_eq!(out.stdout.trim(), self_uri);
    assert_eq!(store.keys("logs"), vec!["runs/1".to_string(), "runs/1/stdout".to_string()]);
    assert_eq!(store.object("logs", "runs/1/stdout").unwrap(), "hello\n");

    let meta = store.metadata("logs", "runs/1");
    assert_eq!(meta.program, "echo");
    assert_eq!(meta.arguments, vec!["hello".to_string()]);
    assert_eq!(meta.stdout_uri, Some(store.uri("logs", "runs/1/stdout")));
    assert_eq!(meta.stderr_uri, None);
    assert_eq!(meta.self_uri, self_uri);
    assert_eq!(meta.exit_code, Some(0));
    assert!(meta.start <= meta.finish);
}

#[test]
fn metadata_uses_published_field_names() {
    let store = Store::new();
    store.s3io("runs/1").args(["sh", "-c", "echo out; echo err >&2"]).passes();

    let raw = store.object("logs", "runs/1").unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    for field in ["program", "arguments", "start", "finish", "stdoutURI", "stderrURI", "selfURI"] {
        assert!(json.get(field).is_some(), "missing {field} in {raw}");
    }
    assert!(json.get("failures").is_none());
}

#[test]
fn stderr_lines_are_timestamped_in_order() {
    let store = Store::new();
    store.s3io("runs/2").args(["sh", "-c", "echo line1 >&2; printf 'line2' >&2"]).passes();

    assert!(store.object("logs", "runs/2/stdout").is_none());
    let stderr = store.object("logs", "runs/2/stderr").unwrap();
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 2);
    for (line, expected) in lines.iter().zip(["line1", "line2"]) {
        let (ts, rest) = line.split_once(' ').unwrap();
        ts.parse::<Timestamp>().unwrap();
        assert_eq!(rest, expected);
    }
    assert!(stderr.ends_with('\n'));
}

#[test]
fn stdout_bytes_are_preserved_exactly() {
    let store = Store::new();
    store.s3io("runs/3").args(["printf", "a\\r\\nb\\n\\nno newline"]).passes();

    assert_eq!(store.object("logs", "runs/3/stdout").unwrap(), "a\r\nb\n\nno newline");
}

#[test]
fn child_exit_code_is_mirrored_after_publishing() {
    let store = Store::new();
    store.s3io("runs/4").args(["sh", "-c", "echo partial; exit 3"]).exits_with(3);

    let meta = store.metadata("logs", "runs/4");
    assert_eq!(meta.exit_code, Some(3));
    assert_eq!(meta.stdout_uri, Some(store.uri("logs", "runs/4/stdout")));
    assert_eq!(store.object("logs", "runs/4/stdout").unwrap(), "partial\n");
}

#[test]
fn silent_command_publishes_only_metadata() {
    let store = Store::new();
    store.s3io("runs/5").arg("true").passes();

    assert_eq!(store.keys("logs"), vec!["runs/5".to_string()]);
    let meta = store.metadata("logs", "runs/5");
    assert_eq!(meta.uri(StreamKind::Stdout), None);
    assert_eq!(meta.uri(StreamKind::Stderr), None);
}

#[test]
fn missing_program_exits_127_with_metadata() {
    let store = Store::new();
    store.s3io("runs/6").arg("/no/such/program").exits_with(127).stderr_has("/no/such/program");

    let meta = store.metadata("logs", "runs/6");
    assert_eq!(meta.program, "/no/such/program");
    assert_eq!(meta.exit_code, None);
}

#[test]
fn remote_input_becomes_stdin() {
    let store = Store::new();
    store.put("inputs", "data/words.txt", b"one\ntwo\nthree\n");

    store
        .s3io("runs/7")
        .args(["--in-bucket", "inputs", "--in-path", "data/words.txt", "sort", "-r"])
        .passes();

    assert_eq!(store.object("logs", "runs/7/stdout").unwrap(), "two\nthree\none\n");
}

#[test]
fn missing_remote_input_fails_without_publishing() {
    let store = Store::new();
    store
        .s3io("runs/8")
        .args(["--in-bucket", "inputs", "--in-path", "absent", "cat"])
        .exits_with(1)
        .stderr_has("absent");

    assert!(store.keys("logs").is_empty());
}

#[test]
fn timeout_cancels_and_still_publishes() {
    let store = Store::new();
    store
        .s3io("runs/9")
        .args(["--timeout", "1", "--kill-grace-ms", "500", "sh", "-c", "echo started; exec sleep 30"])
        .exits_with(130);

    let meta = store.metadata("logs", "runs/9");
    assert_eq!(meta.signal, Some(15));
    assert_eq!(store.object("logs", "runs/9/stdout").unwrap(), "started\n");
}

#[test]
fn staging_dir_is_left_empty() {
    let store = Store::new();
    let staging = tempfile::tempdir().unwrap();
    store
        .s3io("runs/10")
        .env("S3IO_STAGING_DIR", staging.path())
        .args(["echo", "staged"])
        .passes();

    assert_eq!(std::fs::read_dir(staging.path()).unwrap().count(), 0);
    assert_eq!(store.object("logs", "runs/10/stdout").unwrap(), "staged\n");
}
