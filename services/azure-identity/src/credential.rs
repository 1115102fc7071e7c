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

use azaccess_core::time::{now, DateTime};
use azaccess_core::utils::Redact;
use azaccess_core::{Context, Error, Result, SigningCredential};
use log::debug;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::constants::*;
use crate::provide_credential::{request_token, ClientSecretCredentialProvider};
use crate::Config;

/// An application identity authenticated with a client secret.
///
/// The credential is immutable and cheap to clone; build it once per process
/// and hand a clone to every client that needs to talk to Azure.
///
/// Building the credential never touches the network. Tokens are requested
/// lazily through [`ClientSecretCredential::get_token`] or a scoped
/// [`ClientSecretCredentialProvider`].
#[derive(Clone)]
pub struct ClientSecretCredential {
    inner: Arc<Inner>,
}

struct Inner {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    authority_host: String,
}

impl Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("tenant_id", &self.inner.tenant_id)
            .field("client_id", &self.inner.client_id)
            .field("client_secret", &Redact::from(&self.inner.client_secret))
            .field("authority_host", &self.inner.authority_host)
            .finish()
    }
}

impl ClientSecretCredential {
    /// Create a credential from explicit values.
    ///
    /// Fails with [`azaccess_core::ErrorKind::ConfigInvalid`] if any value is empty.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        Self::from_config(Config {
            tenant_id: Some(tenant_id.into()),
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
            authority_host: None,
        })
    }

    /// Create a credential from the context's environment.
    ///
    /// Reads `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET`, `AZURE_TENANT_ID` and the
    /// optional `AZURE_AUTHORITY_HOST`.
    pub fn from_env(ctx: &Context) -> Result<Self> {
        Self::from_config(Config::default().from_env(ctx))
    }

    /// Create a credential from a [`Config`].
    pub fn from_config(config: Config) -> Result<Self> {
        let tenant_id = required(config.tenant_id, AZURE_TENANT_ID)?;
        let client_id = required(config.client_id, AZURE_CLIENT_ID)?;
        let client_secret = required(config.client_secret, AZURE_CLIENT_SECRET)?;
        let authority_host = config
            .authority_host
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| AZURE_PUBLIC_CLOUD.to_string());

        debug!("client secret credential built for tenant {tenant_id}");
        Ok(Self {
            inner: Arc::new(Inner {
                tenant_id,
                client_id,
                client_secret,
                authority_host: authority_host.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Override the Entra ID authority host, for sovereign clouds or tests.
    pub fn with_authority_host(self, authority_host: impl Into<String>) -> Self {
        let authority_host: String = authority_host.into();
        Self {
            inner: Arc::new(Inner {
                tenant_id: self.inner.tenant_id.clone(),
                client_id: self.inner.client_id.clone(),
                client_secret: self.inner.client_secret.clone(),
                authority_host: authority_host.trim_end_matches('/').to_string(),
            }),
        }
    }

    /// The directory (tenant) id.
    pub fn tenant_id(&self) -> &str {
        &self.inner.tenant_id
    }

    /// The application (client) id.
    pub fn client_id(&self) -> &str {
        &self.inner.client_id
    }

    /// The authority host tokens are requested from.
    pub fn authority_host(&self) -> &str {
        &self.inner.authority_host
    }

    pub(crate) fn client_secret(&self) -> &str {
        &self.inner.client_secret
    }

    /// Request a fresh access token for `scope`.
    ///
    /// No caching happens here, wrap [`Self::provider`] in a
    /// [`azaccess_core::Signer`] to reuse tokens.
    pub async fn get_token(&self, ctx: &Context, scope: &str) -> Result<AccessToken> {
        request_token(self, ctx, scope).await
    }

    /// Bind this credential to one token scope.
    pub fn provider(&self, scope: impl Into<String>) -> ClientSecretCredentialProvider {
        ClientSecretCredentialProvider::new(self.clone(), scope)
    }
}

fn required(value: Option<String>, key: &str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::config_invalid(format!(
            "client secret credential requires `{key}`"
        ))
        .with_context(format!("key: {key}"))),
    }
}

/// A bearer token issued by Entra ID.
#[derive(Clone)]
pub struct AccessToken {
    /// The raw bearer token.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_on: DateTime,
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &Redact::from(&self.token))
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>, expires_on: DateTime) -> Self {
        Self {
            token: token.into(),
            expires_on,
        }
    }
}

impl SigningCredential for AccessToken {
    fn is_valid(&self) -> bool {
        if self.token.is_empty() {
            return false;
        }
        // Take 20s as buffer to avoid edge cases.
        self.expires_on > now() + chrono::TimeDelta::seconds(20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azaccess_core::{ErrorKind, StaticEnv};
    use pretty_assertions::assert_eq;

    fn full_env() -> Vec<(&'static str, &'static str)> {
        vec![
            (AZURE_CLIENT_ID, "client"),
            (AZURE_CLIENT_SECRET, "secret"),
            (AZURE_TENANT_ID, "tenant"),
        ]
    }

    #[test]
    fn test_from_env() {
        let ctx = Context::new().with_env(StaticEnv::from_iter(full_env()));

        let cred = ClientSecretCredential::from_env(&ctx).unwrap();
        assert_eq!(cred.tenant_id(), "tenant");
        assert_eq!(cred.client_id(), "client");
        assert_eq!(cred.authority_host(), AZURE_PUBLIC_CLOUD);
    }

    #[test]
    fn test_from_env_missing_each_value() {
        for missing in [AZURE_CLIENT_ID, AZURE_CLIENT_SECRET, AZURE_TENANT_ID] {
            let envs = full_env().into_iter().filter(|(k, _)| *k != missing);
            let ctx = Context::new().with_env(StaticEnv::from_iter(envs));

            let err = ClientSecretCredential::from_env(&ctx).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
            assert!(err.to_string().contains(missing), "{err}");
        }
    }

    #[test]
    fn test_new_rejects_empty_values() {
        let err = ClientSecretCredential::new("tenant", "", "secret").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_authority_host_override() {
        let cred = ClientSecretCredential::new("tenant", "client", "secret")
            .unwrap()
            .with_authority_host("https://login.microsoftonline.us/");
        assert_eq!(cred.authority_host(), "https://login.microsoftonline.us");
        assert_eq!(cred.client_secret(), "secret");
    }

    #[test]
    fn test_debug_never_prints_secret() {
        let cred = ClientSecretCredential::new("tenant", "client", "a-very-long-client-secret")
            .unwrap();
        let output = format!("{cred:?}");
        assert!(!output.contains("a-very-long-client-secret"));
    }

    #[test]
    fn test_access_token_validity() {
        let fresh = AccessToken::new("token", now() + chrono::TimeDelta::try_hours(1).unwrap());
        assert!(fresh.is_valid());

        let almost_expired =
            AccessToken::new("token", now() + chrono::TimeDelta::try_seconds(5).unwrap());
        assert!(!almost_expired.is_valid());

        let empty = AccessToken::new("", now() + chrono::TimeDelta::try_hours(1).unwrap());
        assert!(!empty.is_valid());
    }
}
