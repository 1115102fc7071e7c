use azaccess_azure_storage::{BlobSas, BlobSasPermissions, Config};
use azaccess_core::time::now;
use azaccess_core::ErrorKind;
use pretty_assertions::assert_eq;
use std::time::Duration;

use crate::mock::{FakeAzure, ACCOUNT, ACCOUNT_KEY, MANAGEMENT_KEY};
use crate::{config, shared_key_client, token_client};

#[tokio::test]
async fn test_sign_url_valid_for_24_hours() {
    let client = shared_key_client(&FakeAzure::new());

    let before = now();
    let signed = client.sign_url("samples", "upload_sample.txt").await.unwrap();

    assert_eq!(
        signed.expires_on - signed.issued_at,
        chrono::TimeDelta::hours(24)
    );
    assert!(signed.issued_at <= now());
    assert!(signed.issued_at > before - chrono::TimeDelta::seconds(1));
    assert_eq!(
        signed.url,
        format!(
            "https://myaccount.blob.core.windows.net/samples/upload_sample.txt?{}",
            signed.token
        )
    );

    let expected = BlobSas::new(
        ACCOUNT,
        ACCOUNT_KEY,
        "samples",
        "upload_sample.txt",
        signed.expires_on,
    )
    .query()
    .unwrap();
    assert_eq!(signed.token, expected);
    assert!(signed.token.contains("&sp=r&"), "{}", signed.token);
    assert!(signed.token.contains("&sr=b&"), "{}", signed.token);
}

#[tokio::test]
async fn test_sign_url_with_custom_validity() {
    let client = shared_key_client(&FakeAzure::new());

    let signed = client
        .sign_url_with(
            "samples",
            "a.txt",
            Duration::from_secs(90),
            BlobSasPermissions {
                write: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(
        signed.expires_on - signed.issued_at,
        chrono::TimeDelta::seconds(90)
    );
    assert!(signed.token.contains("&sp=rw&"), "{}", signed.token);
}

#[tokio::test]
async fn test_sign_url_zero_validity() {
    let client = shared_key_client(&FakeAzure::new());

    let err = client
        .sign_url_with(
            "samples",
            "a.txt",
            Duration::from_millis(500),
            BlobSasPermissions::default(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
}

#[tokio::test]
async fn test_sign_url_without_account_key() {
    let fake = FakeAzure::new();
    let client = token_client(&fake, config());

    let err = client.sign_url("samples", "a.txt").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(fake.token_requests(), 0);
}

#[tokio::test]
async fn test_sign_url_with_management_key() {
    let fake = FakeAzure::new();
    let client = token_client(
        &fake,
        Config {
            subscription_id: Some("sub".to_string()),
            resource_group_name: Some("rg".to_string()),
            ..config()
        },
    );

    assert_eq!(client.account_key().await.unwrap(), MANAGEMENT_KEY);

    let signed = client.sign_url("samples", "a.txt").await.unwrap();
    let expected = BlobSas::new(ACCOUNT, MANAGEMENT_KEY, "samples", "a.txt", signed.expires_on)
        .query()
        .unwrap();
    assert_eq!(signed.token, expected);
}
