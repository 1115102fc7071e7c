use azaccess_core::ErrorKind;
use bytes::Bytes;
use pretty_assertions::assert_eq;
use std::io::Write;

use crate::mock::FakeAzure;
use crate::shared_key_client;

fn local_file(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(content).unwrap();
    path
}

#[tokio::test]
async fn test_upload_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = local_file(&dir, "upload_sample.txt", b"Hello, World!\n");

    let fake = FakeAzure::new().with_container("samples");
    let client = shared_key_client(&fake);

    let name = client.upload("samples", &path, true).await.unwrap();
    assert_eq!(name, "upload_sample.txt");

    let content = client.read("samples", &name).await.unwrap();
    assert_eq!(content.as_ref(), b"Hello, World!\n");
}

#[tokio::test]
async fn test_upload_creates_missing_container() {
    let dir = tempfile::tempdir().unwrap();
    let path = local_file(&dir, "upload_sample.txt", b"content");

    let fake = FakeAzure::new();
    let client = shared_key_client(&fake);
    assert!(!client.container_exists("fresh").await.unwrap());

    client.upload("fresh", &path, true).await.unwrap();
    assert!(fake.has_container("fresh"));
    assert!(client.container_exists("fresh").await.unwrap());
    assert_eq!(
        client.list("fresh").collect().await.unwrap(),
        vec!["upload_sample.txt"]
    );
}

#[tokio::test]
async fn test_upload_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = local_file(&dir, "report.csv", b"v2");

    let fake = FakeAzure::new().with_blob("samples", "report.csv", b"v1");
    let client = shared_key_client(&fake);

    let err = client.upload("samples", &path, false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(
        client.read("samples", "report.csv").await.unwrap().as_ref(),
        b"v1"
    );

    client.upload("samples", &path, true).await.unwrap();
    assert_eq!(
        client.read("samples", "report.csv").await.unwrap().as_ref(),
        b"v2"
    );
}

#[tokio::test]
async fn test_upload_missing_local_file() {
    let dir = tempfile::tempdir().unwrap();

    let fake = FakeAzure::new();
    let client = shared_key_client(&fake);

    let err = client
        .upload("samples", dir.path().join("absent.txt"), true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!fake.has_container("samples"));
}

#[tokio::test]
async fn test_upload_bytes_empty_blob() {
    let fake = FakeAzure::new().with_container("samples");
    let client = shared_key_client(&fake);

    client
        .upload_bytes("samples", "empty.bin", Bytes::new(), true)
        .await
        .unwrap();
    assert!(client.read("samples", "empty.bin").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_container_if_not_exists() {
    let fake = FakeAzure::new();
    let client = shared_key_client(&fake);

    assert!(client.create_container_if_not_exists("samples").await.unwrap());
    assert!(!client.create_container_if_not_exists("samples").await.unwrap());
}

#[tokio::test]
async fn test_upload_rejects_empty_names() {
    let client = shared_key_client(&FakeAzure::new());

    let err = client
        .upload_bytes("", "a.txt", Bytes::from_static(b"a"), true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);

    let err = client
        .upload_bytes("samples", "", Bytes::from_static(b"a"), true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
}
