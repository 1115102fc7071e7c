use azaccess_azure_storage::{Config, StorageManagementClient};
use azaccess_core::ErrorKind;
use pretty_assertions::assert_eq;

use crate::mock::{FakeAzure, ACCOUNT, MANAGEMENT_KEY};
use crate::{config, context, credential, init, token_client};

#[tokio::test]
async fn test_list_keys() {
    init();
    let fake = FakeAzure::new();
    let client = StorageManagementClient::new(context(&fake), &credential(), "sub").unwrap();

    let keys = client.list_keys("rg", ACCOUNT).await.unwrap();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].key_name, "key1");
    assert_eq!(keys[0].value, MANAGEMENT_KEY);
    assert_eq!(keys[0].permissions, "FULL");
    assert_eq!(fake.auth_schemes(), vec!["Bearer"]);

    assert!(!format!("{:?}", keys[0]).contains(MANAGEMENT_KEY));
}

#[tokio::test]
async fn test_primary_key_without_keys() {
    init();
    let fake = FakeAzure::new().with_keys(Some(vec![]));
    let client = StorageManagementClient::new(context(&fake), &credential(), "sub").unwrap();

    let err = client.primary_key("rg", ACCOUNT).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
}

#[tokio::test]
async fn test_account_key_unknown_account() {
    let fake = FakeAzure::new().with_keys(None);
    let client = token_client(
        &fake,
        Config {
            subscription_id: Some("sub".to_string()),
            resource_group_name: Some("rg".to_string()),
            ..config()
        },
    );

    let err = client.account_key().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("ResourceNotFound"), "{err}");
}

#[test]
fn test_requires_subscription() {
    let err = StorageManagementClient::new(
        context(&FakeAzure::new()),
        &credential(),
        "",
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}
