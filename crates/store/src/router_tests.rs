// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn file_endpoint_opens_fs_store() {
    let store = StoreRouter::open("file:///tmp/s3io", "logs").unwrap();
    assert!(matches!(store, StoreRouter::Fs(_)));
    assert_eq!(store.endpoint(), "file:///tmp/s3io");
    assert_eq!(store.bucket(), "logs");
}

#[test]
fn http_endpoint_opens_http_store() {
    let store = StoreRouter::open("http://127.0.0.1:9000", "logs").unwrap();
    assert!(matches!(store, StoreRouter::Http(_)));
    assert_eq!(store.with_bucket("inputs").bucket(), "inputs");
}

#[yare::parameterized(
    https = { "https://s3.amazonaws.com" },
    bare = { "s3.amazonaws.com" },
    empty_file = { "file://" },
)]
fn unsupported_endpoints_fail(endpoint: &str) {
    assert!(matches!(
        StoreRouter::open(endpoint, "logs"),
        Err(StoreError::InvalidEndpoint { .. })
    ));
}

#[tokio::test]
async fn delegates_puts() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = format!("file://{}", dir.path().display());
    let store = StoreRouter::open(&endpoint, "logs").unwrap();
    let path = ObjectPath::new("runs/1/stdout").unwrap();

    store
        .put(&path, b"out".to_vec(), ContentType::TextPlain, Visibility::PublicRead)
        .await
        .unwrap();

    let StoreRouter::Fs(fs) = &store else {
        panic!("expected FsStore");
    };
    assert_eq!(std::fs::read(fs.object_file(&path)).unwrap(), b"out");
}
