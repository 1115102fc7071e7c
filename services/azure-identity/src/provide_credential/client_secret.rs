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

use crate::{AccessToken, ClientSecretCredential};
use async_trait::async_trait;
use azaccess_core::{Context, Error, ProvideCredential, Result};
use http::StatusCode;
use log::{debug, warn};
use serde::Deserialize;

/// Load access tokens for one scope with a client secret.
///
/// This provider implements the OAuth 2.0 client credentials grant, which allows
/// applications to authenticate to Azure services using a client ID and client
/// secret.
///
/// Reference: <https://learn.microsoft.com/en-us/entra/identity-platform/v2-oauth2-client-creds-grant-flow>
#[derive(Debug, Clone)]
pub struct ClientSecretCredentialProvider {
    credential: ClientSecretCredential,
    scope: String,
}

impl ClientSecretCredentialProvider {
    /// Create a new provider for `scope`, e.g. `https://storage.azure.com/.default`.
    pub fn new(credential: ClientSecretCredential, scope: impl Into<String>) -> Self {
        Self {
            credential,
            scope: scope.into(),
        }
    }

    /// The scope tokens are requested for.
    pub fn scope(&self) -> &str {
        &self.scope
    }
}

#[async_trait]
impl ProvideCredential for ClientSecretCredentialProvider {
    type Credential = AccessToken;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        request_token(&self.credential, ctx, &self.scope)
            .await
            .map(Some)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct TokenErrorResponse {
    error: String,
    error_description: String,
}

pub(crate) async fn request_token(
    credential: &ClientSecretCredential,
    ctx: &Context,
    scope: &str,
) -> Result<AccessToken> {
    if scope.is_empty() {
        return Err(Error::request_invalid("token scope must not be empty"));
    }

    let url = format!(
        "{}/{}/oauth2/v2.0/token",
        credential.authority_host(),
        credential.tenant_id()
    );

    let body = form_urlencoded::Serializer::new(String::new())
        .append_pair("scope", scope)
        .append_pair("client_id", credential.client_id())
        .append_pair("client_secret", credential.client_secret())
        .append_pair("grant_type", "client_credentials")
        .finish();

    let req = http::Request::builder()
        .method(http::Method::POST)
        .uri(&url)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(bytes::Bytes::from(body))
        .map_err(|e| {
            Error::request_invalid("failed to build client secret token request")
                .with_source(e)
                .with_context(format!("tenant_id: {}", credential.tenant_id()))
        })?;

    debug!("requesting token for scope {scope}");
    let resp = ctx.http_send_as_string(req).await.map_err(|e| {
        e.with_context("operation: request token")
            .with_context(format!("tenant_id: {}", credential.tenant_id()))
    })?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.into_body();
        let detail: TokenErrorResponse = serde_json::from_str(&body).unwrap_or_default();
        warn!(
            "token request for scope {scope} failed with status {status}: {}",
            detail.error
        );
        return Err(token_error(status, &detail)
            .with_context(format!("tenant_id: {}", credential.tenant_id()))
            .with_context(format!("scope: {scope}")));
    }

    let token: TokenResponse = serde_json::from_str(resp.body()).map_err(|e| {
        Error::unexpected("failed to parse client secret token response").with_source(e)
    })?;

    let now = azaccess_core::time::now();
    // Fall back to 10 minutes when the lifetime can't be represented.
    let expires_on = i64::try_from(token.expires_in)
        .ok()
        .and_then(chrono::TimeDelta::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .unwrap_or_else(|| now + chrono::TimeDelta::minutes(10));

    Ok(AccessToken::new(token.access_token, expires_on))
}

fn token_error(status: StatusCode, detail: &TokenErrorResponse) -> Error {
    let message = if detail.error_description.is_empty() {
        format!("client secret token request failed with status {status}")
    } else {
        format!(
            "client secret token request rejected: {}",
            detail.error_description
        )
    };

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Error::credential_invalid(message)
            .with_context(format!("status: {status}"))
            .with_context(format!("error: {}", detail.error)),
        StatusCode::FORBIDDEN => Error::credential_denied(message)
            .with_context(format!("status: {status}"))
            .with_context(format!("error: {}", detail.error)),
        _ => Error::from_status(status, message),
    }
}
