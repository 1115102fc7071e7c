use azaccess_azure_identity::{
    AccessToken, BearerTokenSigner, ClientSecretCredential, MANAGEMENT_SCOPE,
};
use azaccess_core::utils::Redact;
use azaccess_core::{Context, Error, Result, Signer};
use bytes::Bytes;
use log::{debug, warn};
use serde::Deserialize;
use std::fmt::{Debug, Formatter};

use crate::config::missing;
use crate::constants::*;

/// Client for the `Microsoft.Storage` resource provider.
///
/// Only the account key lookup is implemented.
#[derive(Clone, Debug)]
pub struct StorageManagementClient {
    signer: Signer<AccessToken>,
    subscription_id: String,
    endpoint: String,
}

/// One access key of a storage account.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountKey {
    /// `key1` or `key2`.
    pub key_name: String,
    /// The base64 encoded key.
    pub value: String,
    /// `FULL` or `READ`.
    #[serde(default)]
    pub permissions: String,
}

impl Debug for StorageAccountKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageAccountKey")
            .field("key_name", &self.key_name)
            .field("value", &Redact::from(&self.value))
            .field("permissions", &self.permissions)
            .finish()
    }
}

#[derive(Deserialize)]
struct ListKeysResponse {
    #[serde(default)]
    keys: Vec<StorageAccountKey>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ArmErrorResponse {
    error: ArmError,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ArmError {
    code: String,
    message: String,
}

impl StorageManagementClient {
    /// Create a client for `subscription_id`.
    pub fn new(
        ctx: Context,
        credential: &ClientSecretCredential,
        subscription_id: impl Into<String>,
    ) -> Result<Self> {
        let subscription_id = subscription_id.into();
        if subscription_id.is_empty() {
            return Err(missing(SUBSCRIPTION_ID));
        }

        Ok(Self {
            signer: Signer::new(ctx, credential.provider(MANAGEMENT_SCOPE), BearerTokenSigner),
            subscription_id,
            endpoint: MANAGEMENT_ENDPOINT.to_string(),
        })
    }

    /// Override the resource manager endpoint, for sovereign clouds or tests.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint: String = endpoint.into();
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// The subscription this client works in.
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// List the access keys of a storage account.
    ///
    /// Reference: <https://learn.microsoft.com/en-us/rest/api/storagerp/storage-accounts/list-keys>
    pub async fn list_keys(
        &self,
        resource_group: &str,
        account_name: &str,
    ) -> Result<Vec<StorageAccountKey>> {
        if resource_group.is_empty() {
            return Err(missing(RESOURCE_GROUP_NAME));
        }
        if account_name.is_empty() {
            return Err(missing(STORAGE_ACCOUNT_NAME));
        }

        let url = format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts/{}/listKeys?api-version={}",
            self.endpoint, self.subscription_id, resource_group, account_name, MANAGEMENT_API_VERSION
        );
        debug!("listing keys of storage account {account_name}");

        let (mut parts, body) = http::Request::post(&url)
            .header(http::header::CONTENT_LENGTH, "0")
            .body(Bytes::new())?
            .into_parts();
        self.signer.sign(&mut parts, None).await?;

        let resp = self
            .signer
            .context()
            .http_send(http::Request::from_parts(parts, body))
            .await
            .map_err(|e| e.with_context("operation: list storage account keys"))?;

        let status = resp.status();
        let body = resp.into_body();
        if !status.is_success() {
            let detail: ArmErrorResponse = serde_json::from_slice(&body).unwrap_or_default();
            warn!(
                "list keys of storage account {account_name} failed with status {status}: {}",
                detail.error.code
            );
            let message = if detail.error.message.is_empty() {
                format!("list storage account keys failed with status {status}")
            } else {
                detail.error.message
            };
            return Err(Error::from_status(status, message)
                .with_context(format!("code: {}", detail.error.code))
                .with_context(format!("account_name: {account_name}"))
                .with_context(format!("resource_group: {resource_group}")));
        }

        let resp: ListKeysResponse = serde_json::from_slice(&body).map_err(|e| {
            Error::unexpected("failed to parse list keys response").with_source(e)
        })?;
        Ok(resp.keys)
    }

    /// The first key of the storage account.
    pub async fn primary_key(&self, resource_group: &str, account_name: &str) -> Result<String> {
        self.list_keys(resource_group, account_name)
            .await?
            .into_iter()
            .next()
            .map(|k| k.value)
            .ok_or_else(|| {
                Error::unexpected("storage account has no access keys")
                    .with_context(format!("account_name: {account_name}"))
            })
    }
}
