// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use s3io_store::FakeStore;
use tokio::io::AsyncWriteExt;

fn path(key: &str) -> ObjectPath {
    ObjectPath::new(key).unwrap()
}

async fn staged(content: &[u8]) -> StagingBuffer {
    let mut buffer = StagingBuffer::create(None).unwrap();
    buffer.write_all(content).await.unwrap();
    buffer
}

#[tokio::test]
async fn uploads_whole_buffer_as_public_text() {
    let store = FakeStore::new("logs");
    let uploader = ArtifactUploader::new(store.clone());
    let mut buffer = staged(b"hello\n").await;

    let uri = uploader.upload(&mut buffer, &path("run/stdout")).await.unwrap();

    assert_eq!(uri.as_deref(), Some("http://fake.store/logs/run/stdout"));
    let obj = store.object("run/stdout").unwrap();
    assert_eq!(obj.body, b"hello\n");
    assert_eq!(obj.content_type, ContentType::TextPlain);
    assert_eq!(obj.visibility, Visibility::PublicRead);
}

#[tokio::test]
async fn empty_buffer_is_not_uploaded() {
    let store = FakeStore::default();
    let uploader = ArtifactUploader::new(store.clone());
    let mut buffer = staged(b"").await;

    assert_eq!(uploader.upload(&mut buffer, &path("run/stderr")).await.unwrap(), None);
    assert!(store.puts().is_empty());
}

#[tokio::test]
async fn store_failure_is_returned() {
    let store = FakeStore::default();
    store.fail_key("run/stdout", "throttled");
    let uploader = ArtifactUploader::new(store);
    let mut buffer = staged(b"x").await;

    let err = uploader.upload(&mut buffer, &path("run/stdout")).await.unwrap_err();
    assert!(matches!(err, UploadError::Store(_)));
}

#[tokio::test]
async fn publish_sets_content_type() {
    let store = FakeStore::default();
    let uploader = ArtifactUploader::new(store.clone());

    let uri = uploader.publish(&path("run"), b"{}".to_vec(), ContentType::TextJavascript).await.unwrap();

    assert_eq!(uri, "http://fake.store/logs/run");
    assert_eq!(store.object("run").unwrap().content_type, ContentType::TextJavascript);
}

#[tokio::test]
async fn spawned_upload_reports_outcome() {
    let cases: [(&[u8], Option<&str>, ArtifactOutcome); 3] = [
        (b"data", None, ArtifactOutcome::Published("http://fake.store/logs/run/stdout".into())),
        (b"", None, ArtifactOutcome::Empty),
        (b"data", Some("throttled"), ArtifactOutcome::Failed("store returned HTTP 503: throttled".into())),
    ];
    for (content, failure, expected) in cases {
        let store = FakeStore::default();
        if let Some(message) = failure {
            store.fail_key("run/stdout", message);
        }
        let uploader = ArtifactUploader::new(store);

        let rx =
            uploader.spawn(StreamKind::Stdout, staged(content).await, path("run/stdout"), &Span::none());
        assert_eq!(rx.await.unwrap(), expected);
    }
}
