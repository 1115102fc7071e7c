use azaccess_azure_identity::ClientSecretCredential;
use azaccess_core::time::{now, truncate_to_seconds};
use azaccess_core::utils::{redact_sas_signature, Redact};
use azaccess_core::{Context, Error, Result, Signer};
use bytes::Bytes;
use http::{header, HeaderValue, Method, StatusCode};
use log::{debug, info};
use percent_encoding::percent_encode;
use quick_xml::de;
use serde::Deserialize;
use std::collections::VecDeque;
use std::fmt::{Debug, Formatter};
use std::path::Path;
use std::time::Duration;

use crate::config::missing;
use crate::constants::*;
use crate::error::{error_code, parse_error};
use crate::{
    BlobSas, BlobSasPermissions, Config, Credential, RequestSigner, SignedUrl,
    StaticCredentialProvider, StorageManagementClient, TokenCredentialProvider,
};

/// Default lifetime of a signed blob url.
pub const DEFAULT_SAS_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);

/// Client for one storage account's Blob service.
///
/// Cloning is cheap, clones share the cached credential.
#[derive(Clone)]
pub struct BlobClient {
    signer: Signer<Credential>,
    endpoint: String,
    account_name: String,
    account_key: AccountKey,
}

#[derive(Clone)]
enum AccountKey {
    Management {
        client: StorageManagementClient,
        resource_group: String,
    },
    Static(String),
    Unset,
}

impl Debug for BlobClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let key = match &self.account_key {
            AccountKey::Management { resource_group, .. } => format!("management({resource_group})"),
            AccountKey::Static(key) => format!("static({:?})", Redact::from(key)),
            AccountKey::Unset => "unset".to_string(),
        };
        f.debug_struct("BlobClient")
            .field("endpoint", &self.endpoint)
            .field("account_name", &self.account_name)
            .field("account_key", &key)
            .finish()
    }
}

impl BlobClient {
    /// Create a client that authorizes blob calls with Entra ID tokens issued
    /// to `credential`.
    ///
    /// The account key used for signing urls comes from the management plane
    /// when `subscription_id` and `resource_group_name` are configured, and from
    /// `account_key` otherwise.
    pub fn new(ctx: Context, config: &Config, credential: &ClientSecretCredential) -> Result<Self> {
        let account_key = match (&config.subscription_id, &config.resource_group_name) {
            (Some(subscription_id), Some(resource_group)) => AccountKey::Management {
                client: StorageManagementClient::new(ctx.clone(), credential, subscription_id)?,
                resource_group: resource_group.clone(),
            },
            _ => static_key(config),
        };

        Self::build(
            Signer::new(ctx, TokenCredentialProvider::new(credential), RequestSigner::new()),
            config,
            account_key,
        )
    }

    /// Create a client that authorizes blob calls with the configured account key.
    pub fn with_shared_key(ctx: Context, config: &Config) -> Result<Self> {
        let account_name = config.account_name()?;
        let account_key = config
            .account_key
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| missing(STORAGE_ACCOUNT_KEY))?;

        Self::build(
            Signer::new(
                ctx,
                StaticCredentialProvider::new_shared_key(account_name, account_key),
                RequestSigner::new(),
            ),
            config,
            static_key(config),
        )
    }

    fn build(signer: Signer<Credential>, config: &Config, account_key: AccountKey) -> Result<Self> {
        Ok(Self {
            signer,
            endpoint: config.endpoint()?,
            account_name: config.account_name()?.to_string(),
            account_key,
        })
    }

    /// The storage account name.
    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// The blob service endpoint, like `https://myaccount.blob.core.windows.net`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The url of a blob, without any token.
    pub fn blob_url(&self, container: &str, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint,
            container,
            percent_encode(name.as_bytes(), &AZURE_PATH_ENCODE_SET)
        )
    }

    fn container_url(&self, container: &str) -> String {
        format!("{}/{}?restype=container", self.endpoint, container)
    }

    async fn send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (mut parts, body) = req.into_parts();
        self.signer.sign(&mut parts, None).await?;
        self.signer
            .context()
            .http_send(http::Request::from_parts(parts, body))
            .await
    }

    /// List the names of all blobs in `container`.
    ///
    /// Nothing is fetched until the first call to [`BlobLister::next`].
    pub fn list(&self, container: &str) -> BlobLister {
        BlobLister {
            client: self.clone(),
            container: container.to_string(),
            buffer: VecDeque::new(),
            marker: None,
            done: false,
        }
    }

    /// Fetch one page of the listing, returning the names and the marker of
    /// the next page.
    ///
    /// Reference: <https://learn.microsoft.com/en-us/rest/api/storageservices/list-blobs>
    async fn list_page(
        &self,
        container: &str,
        marker: Option<&str>,
    ) -> Result<(Vec<String>, Option<String>)> {
        check_container(container)?;

        let mut url = format!("{}&comp=list", self.container_url(container));
        if let Some(marker) = marker {
            url.push_str("&marker=");
            url.extend(form_urlencoded::byte_serialize(marker.as_bytes()));
        }
        debug!("listing blobs in container {container}");

        let resp = self
            .send(http::Request::get(&url).body(Bytes::new())?)
            .await
            .map_err(|e| with_target(e, "list blobs", container, None))?;
        if resp.status() != StatusCode::OK {
            return Err(with_target(parse_error(resp), "list blobs", container, None));
        }

        let body = String::from_utf8_lossy(resp.body()).to_string();
        let result: EnumerationResults = de::from_str(&body).map_err(|e| {
            Error::unexpected("failed to parse list blobs response")
                .with_source(e)
                .with_context(format!("container: {container}"))
        })?;

        let names = result.blobs.blob.into_iter().map(|b| b.name).collect();
        let next = Some(result.next_marker).filter(|v| !v.is_empty());
        Ok((names, next))
    }

    /// Read the whole content of a blob.
    ///
    /// Reference: <https://learn.microsoft.com/en-us/rest/api/storageservices/get-blob>
    pub async fn read(&self, container: &str, name: &str) -> Result<Bytes> {
        check_container(container)?;
        check_blob(name)?;

        let resp = self
            .send(http::Request::get(self.blob_url(container, name)).body(Bytes::new())?)
            .await
            .map_err(|e| with_target(e, "read blob", container, Some(name)))?;
        if resp.status() != StatusCode::OK {
            return Err(with_target(parse_error(resp), "read blob", container, Some(name)));
        }

        Ok(resp.into_body())
    }

    /// Upload a local file to `container`, creating the container first if it
    /// doesn't exist.
    ///
    /// The blob is named after the file name of `local_path`, which is returned.
    pub async fn upload(
        &self,
        container: &str,
        local_path: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<String> {
        let path = local_path.as_ref();
        let (Some(path_str), Some(name)) = (path.to_str(), path.file_name().and_then(|v| v.to_str()))
        else {
            return Err(Error::request_invalid("upload source must be a utf-8 file path")
                .with_context(format!("path: {}", path.display())));
        };

        let content = self.signer.context().file_read(path_str).await?;

        if self.create_container_if_not_exists(container).await? {
            info!("created container {container}");
        }
        self.upload_bytes(container, name, Bytes::from(content), overwrite)
            .await?;

        Ok(name.to_string())
    }

    /// Upload `content` as a block blob.
    ///
    /// With `overwrite` unset an existing blob fails the upload with
    /// [`azaccess_core::ErrorKind::AlreadyExists`].
    ///
    /// Reference: <https://learn.microsoft.com/en-us/rest/api/storageservices/put-blob>
    pub async fn upload_bytes(
        &self,
        container: &str,
        name: &str,
        content: Bytes,
        overwrite: bool,
    ) -> Result<()> {
        check_container(container)?;
        check_blob(name)?;

        let mut req = http::Request::builder()
            .method(Method::PUT)
            .uri(self.blob_url(container, name))
            .header(X_MS_BLOB_TYPE, "BlockBlob")
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .header(header::CONTENT_LENGTH, content.len());
        if !overwrite {
            req = req.header(header::IF_NONE_MATCH, HeaderValue::from_static("*"));
        }
        let size = content.len();

        let resp = self
            .send(req.body(content)?)
            .await
            .map_err(|e| with_target(e, "upload blob", container, Some(name)))?;
        if resp.status() != StatusCode::CREATED {
            return Err(with_target(parse_error(resp), "upload blob", container, Some(name)));
        }

        debug!("uploaded {size} bytes to {container}/{name}");
        Ok(())
    }

    /// Check whether `container` exists.
    ///
    /// Reference: <https://learn.microsoft.com/en-us/rest/api/storageservices/get-container-properties>
    pub async fn container_exists(&self, container: &str) -> Result<bool> {
        check_container(container)?;

        let resp = self
            .send(
                http::Request::head(self.container_url(container)).body(Bytes::new())?,
            )
            .await
            .map_err(|e| with_target(e, "get container properties", container, None))?;

        match resp.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(with_target(
                parse_error(resp),
                "get container properties",
                container,
                None,
            )),
        }
    }

    /// Create `container`, returning `false` if it already existed.
    ///
    /// Reference: <https://learn.microsoft.com/en-us/rest/api/storageservices/create-container>
    pub async fn create_container_if_not_exists(&self, container: &str) -> Result<bool> {
        check_container(container)?;

        let req = http::Request::put(self.container_url(container))
            .header(header::CONTENT_LENGTH, "0")
            .body(Bytes::new())?;
        let resp = self
            .send(req)
            .await
            .map_err(|e| with_target(e, "create container", container, None))?;

        match resp.status() {
            StatusCode::CREATED => Ok(true),
            StatusCode::CONFLICT
                if error_code(&resp).as_deref() == Some("ContainerAlreadyExists") =>
            {
                Ok(false)
            }
            _ => Err(with_target(parse_error(resp), "create container", container, None)),
        }
    }

    /// The primary access key of the storage account.
    pub async fn account_key(&self) -> Result<String> {
        match &self.account_key {
            AccountKey::Management {
                client,
                resource_group,
            } => client.primary_key(resource_group, &self.account_name).await,
            AccountKey::Static(key) => Ok(key.clone()),
            AccountKey::Unset => Err(missing(STORAGE_ACCOUNT_KEY)
                .with_context("operation: get account key")
                .with_context(format!("account_name: {}", self.account_name))),
        }
    }

    /// Sign a read only url for a blob, valid for [`DEFAULT_SAS_EXPIRY`].
    pub async fn sign_url(&self, container: &str, name: &str) -> Result<SignedUrl> {
        self.sign_url_with(container, name, DEFAULT_SAS_EXPIRY, BlobSasPermissions::default())
            .await
    }

    /// Sign a url for a blob with the account key.
    ///
    /// The token expires exactly `expires_in` after its issuance, which is
    /// truncated to whole seconds.
    pub async fn sign_url_with(
        &self,
        container: &str,
        name: &str,
        expires_in: Duration,
        permissions: BlobSasPermissions,
    ) -> Result<SignedUrl> {
        check_container(container)?;
        check_blob(name)?;
        if expires_in.as_secs() == 0 {
            return Err(Error::request_invalid(
                "signed url must be valid for at least one second",
            ));
        }
        let validity = chrono::TimeDelta::from_std(expires_in).map_err(|e| {
            Error::request_invalid("signed url validity is out of range").with_source(e)
        })?;

        let key = self.account_key().await?;
        let issued_at = truncate_to_seconds(now());
        let expires_on = issued_at + validity;

        let token = BlobSas::new(&self.account_name, key, container, name, expires_on)
            .with_permissions(permissions)
            .query()
            .map_err(|e| with_target(e, "sign blob url", container, Some(name)))?;
        let url = format!("{}?{}", self.blob_url(container, name), token);
        debug!("signed blob url: {}", redact_sas_signature(&url));

        Ok(SignedUrl {
            token,
            url,
            issued_at,
            expires_on,
        })
    }
}

/// Lazy listing of the blob names in a container.
///
/// Pages are fetched on demand, following the continuation marker.
#[derive(Debug)]
pub struct BlobLister {
    client: BlobClient,
    container: String,
    buffer: VecDeque<String>,
    marker: Option<String>,
    done: bool,
}

impl BlobLister {
    /// The next blob name, `None` once the listing is exhausted.
    ///
    /// A failed page fetch leaves the lister untouched so it can be retried.
    pub async fn next(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(name) = self.buffer.pop_front() {
                return Ok(Some(name));
            }
            if self.done {
                return Ok(None);
            }

            let (names, next) = self
                .client
                .list_page(&self.container, self.marker.as_deref())
                .await?;
            self.buffer.extend(names);
            self.done = next.is_none();
            self.marker = next;
        }
    }

    /// Restart the listing from the first page.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.marker = None;
        self.done = false;
    }

    /// Drain the remaining names.
    pub async fn collect(mut self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        while let Some(name) = self.next().await? {
            names.push(name);
        }
        Ok(names)
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct EnumerationResults {
    blobs: Blobs,
    next_marker: String,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct Blobs {
    blob: Vec<ListedBlob>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ListedBlob {
    name: String,
}

fn static_key(config: &Config) -> AccountKey {
    match config.account_key.as_deref().filter(|v| !v.is_empty()) {
        Some(key) => AccountKey::Static(key.to_string()),
        None => AccountKey::Unset,
    }
}

fn check_container(container: &str) -> Result<()> {
    if container.is_empty() {
        return Err(Error::request_invalid("container name must not be empty"));
    }
    Ok(())
}

fn check_blob(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::request_invalid("blob name must not be empty"));
    }
    Ok(())
}

fn with_target(err: Error, operation: &str, container: &str, blob: Option<&str>) -> Error {
    let err = err
        .with_context(format!("operation: {operation}"))
        .with_context(format!("container: {container}"));
    match blob {
        Some(blob) => err.with_context(format!("blob: {blob}")),
        None => err,
    }
}
