use azaccess_core::ErrorKind;
use pretty_assertions::assert_eq;

use crate::mock::FakeAzure;
use crate::{config, shared_key_client, token_client};

#[tokio::test]
async fn test_read_blob() {
    let fake = FakeAzure::new().with_blob("samples", "hello.txt", b"Hello, Azure!");
    let client = shared_key_client(&fake);

    let content = client.read("samples", "hello.txt").await.unwrap();
    assert_eq!(content.as_ref(), b"Hello, Azure!");
    assert_eq!(fake.auth_schemes(), vec!["SharedKey"]);
}

#[tokio::test]
async fn test_read_missing_blob() {
    let fake = FakeAzure::new().with_container("samples");
    let client = shared_key_client(&fake);

    let err = client.read("samples", "absent.txt").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("BlobNotFound"), "{err}");
    assert!(err.to_string().contains("absent.txt"), "{err}");
}

#[tokio::test]
async fn test_read_missing_container() {
    let client = shared_key_client(&FakeAzure::new());

    let err = client.read("absent", "a.txt").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_read_with_token_reuses_it() {
    let fake = FakeAzure::new()
        .with_blob("samples", "a.txt", b"a")
        .with_blob("samples", "b.txt", b"b");
    let client = token_client(&fake, config());

    assert_eq!(client.read("samples", "a.txt").await.unwrap().as_ref(), b"a");
    assert_eq!(client.read("samples", "b.txt").await.unwrap().as_ref(), b"b");

    assert_eq!(fake.token_requests(), 1);
    assert_eq!(fake.auth_schemes(), vec!["Bearer", "Bearer"]);
}
