// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use azaccess_azure_identity::{
    AccessToken, BearerTokenSigner, ClientSecretCredential, KEY_VAULT_SCOPE,
};
use azaccess_core::{Context, Error, Result, Signer};
use bytes::Bytes;
use http::StatusCode;
use log::{debug, warn};
use percent_encoding::utf8_percent_encode;
use serde::Deserialize;

use crate::constants::*;
use crate::secret::{Secret, SecretBundle};

/// Client for the secrets of one Key Vault.
#[derive(Clone, Debug)]
pub struct SecretClient {
    signer: Signer<AccessToken>,
    vault_url: String,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct KeyVaultErrorResponse {
    error: KeyVaultError,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct KeyVaultError {
    code: String,
    message: String,
}

impl SecretClient {
    /// Create a client for `vault_url`, like `https://myvault.vault.azure.net`.
    pub fn new(
        ctx: Context,
        vault_url: impl Into<String>,
        credential: &ClientSecretCredential,
    ) -> Result<Self> {
        let vault_url: String = vault_url.into();
        let vault_url = vault_url.trim_end_matches('/');
        if vault_url.is_empty() {
            return Err(
                Error::config_invalid(format!("key vault requires `{AZURE_VAULT_URL}`"))
                    .with_context(format!("key: {AZURE_VAULT_URL}")),
            );
        }

        Ok(Self {
            signer: Signer::new(ctx, credential.provider(KEY_VAULT_SCOPE), BearerTokenSigner),
            vault_url: vault_url.to_string(),
        })
    }

    /// Create a client for the vault named by `AZURE_VAULT_URL`.
    pub fn from_env(ctx: Context, credential: &ClientSecretCredential) -> Result<Self> {
        let vault_url = ctx.env_var_required(AZURE_VAULT_URL)?;
        Self::new(ctx, vault_url, credential)
    }

    /// The vault this client reads from.
    pub fn vault_url(&self) -> &str {
        &self.vault_url
    }

    /// Fetch the latest version of a secret.
    pub async fn get_secret(&self, name: &str) -> Result<Secret> {
        self.fetch(name, None).await
    }

    /// Fetch the latest value of a secret.
    pub async fn get_secret_value(&self, name: &str) -> Result<String> {
        Ok(self.get_secret(name).await?.value)
    }

    /// Fetch one version of a secret.
    pub async fn get_secret_version(&self, name: &str, version: &str) -> Result<Secret> {
        if version.is_empty() {
            return Err(Error::request_invalid("secret version must not be empty"));
        }
        self.fetch(name, Some(version)).await
    }

    async fn fetch(&self, name: &str, version: Option<&str>) -> Result<Secret> {
        if name.is_empty() {
            return Err(Error::request_invalid("secret name must not be empty"));
        }

        let mut url = format!(
            "{}/secrets/{}",
            self.vault_url,
            utf8_percent_encode(name, &SECRET_PATH_ENCODE_SET)
        );
        if let Some(version) = version {
            url.push('/');
            url.extend(utf8_percent_encode(version, &SECRET_PATH_ENCODE_SET));
        }
        url.push_str("?api-version=");
        url.push_str(KEY_VAULT_API_VERSION);
        debug!("fetching secret {name} from {}", self.vault_url);

        let (mut parts, body) = http::Request::get(&url).body(Bytes::new())?.into_parts();
        self.signer.sign(&mut parts, None).await?;

        let resp = self
            .signer
            .context()
            .http_send(http::Request::from_parts(parts, body))
            .await
            .map_err(|e| e.with_context(format!("secret: {name}")))?;

        let status = resp.status();
        let body = resp.into_body();
        if status != StatusCode::OK {
            let detail: KeyVaultErrorResponse = serde_json::from_slice(&body).unwrap_or_default();
            warn!(
                "get secret {name} failed with status {status}: {}",
                detail.error.code
            );
            let message = if detail.error.message.is_empty() {
                format!("get secret failed with status {status}")
            } else {
                detail.error.message
            };
            return Err(Error::from_status(status, message)
                .with_context(format!("code: {}", detail.error.code))
                .with_context(format!("secret: {name}"))
                .with_context(format!("vault: {}", self.vault_url)));
        }

        let bundle: SecretBundle = serde_json::from_slice(&body).map_err(|e| {
            Error::unexpected("failed to parse secret response")
                .with_source(e)
                .with_context(format!("secret: {name}"))
        })?;
        Ok(Secret::from_bundle(name, bundle))
    }
}
