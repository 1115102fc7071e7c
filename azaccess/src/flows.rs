//! Entry points of the command line tools.
//!
//! Every flow resolves the client secret credential and its own settings from
//! the context's environment, so the binaries stay a thin shell around them.

use azaccess_azure_identity::ClientSecretCredential;
use azaccess_core::{Context, Result};

/// Env key naming the blob the flows work on.
pub const BLOB_NAME: &str = "BLOB_NAME";
/// Blob name used when [`BLOB_NAME`] is unset.
pub const DEFAULT_BLOB_NAME: &str = "upload_sample.txt";
/// Env key naming the secret to read.
pub const SECRET_NAME: &str = "SECRET_NAME";
/// Secret name used when [`SECRET_NAME`] is unset.
pub const DEFAULT_SECRET_NAME: &str = "kundan";

fn env_or(ctx: &Context, key: &str, default: &str) -> String {
    ctx.env_var(key)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(feature = "storage")]
mod storage {
    use super::*;
    use azaccess_azure_storage::{BlobClient, Config, SignedUrl};
    use bytes::Bytes;
    use log::info;

    fn blob_client(ctx: &Context) -> Result<(BlobClient, String)> {
        let credential = ClientSecretCredential::from_env(ctx)?;
        let config = Config::default().from_env(ctx);
        let container = config.container_name()?.to_string();

        Ok((BlobClient::new(ctx.clone(), &config, &credential)?, container))
    }

    /// Sign a read only url for `CONTAINER_NAME/BLOB_NAME`, valid for 24 hours.
    pub async fn sign_blob_url(ctx: &Context) -> Result<SignedUrl> {
        let (client, container) = blob_client(ctx)?;
        let name = env_or(ctx, BLOB_NAME, DEFAULT_BLOB_NAME);

        let signed = client.sign_url(&container, &name).await?;
        info!("signed url for {container}/{name} expires at {}", signed.expires_on);
        Ok(signed)
    }

    /// Names of every blob in `CONTAINER_NAME`.
    pub async fn list_blobs(ctx: &Context) -> Result<Vec<String>> {
        let (client, container) = blob_client(ctx)?;
        client.list(&container).collect().await
    }

    /// Content of `CONTAINER_NAME/BLOB_NAME`.
    pub async fn read_blob(ctx: &Context) -> Result<Bytes> {
        let (client, container) = blob_client(ctx)?;
        let name = env_or(ctx, BLOB_NAME, DEFAULT_BLOB_NAME);

        client.read(&container, &name).await
    }

    /// Name and content of every blob in `CONTAINER_NAME`, in listing order.
    pub async fn read_all_blobs(ctx: &Context) -> Result<Vec<(String, Bytes)>> {
        let (client, container) = blob_client(ctx)?;

        let mut blobs = Vec::new();
        let mut lister = client.list(&container);
        while let Some(name) = lister.next().await? {
            let content = client.read(&container, &name).await?;
            info!("read {container}/{name}: {} bytes", content.len());
            blobs.push((name, content));
        }
        Ok(blobs)
    }

    /// Upload a local file into `CONTAINER_NAME`, overwriting any blob of the
    /// same name.
    pub async fn upload_file(ctx: &Context, local_path: &str) -> Result<String> {
        let (client, container) = blob_client(ctx)?;

        let name = client.upload(&container, local_path, true).await?;
        info!("uploaded {local_path} to {container}/{name}");
        Ok(name)
    }
}
#[cfg(feature = "storage")]
pub use storage::*;

/// Value of the secret named by `SECRET_NAME` in `AZURE_VAULT_URL`.
#[cfg(feature = "keyvault")]
pub async fn read_secret(ctx: &Context) -> Result<String> {
    use azaccess_azure_keyvault::SecretClient;

    let credential = ClientSecretCredential::from_env(ctx)?;
    let client = SecretClient::from_env(ctx.clone(), &credential)?;
    let name = env_or(ctx, SECRET_NAME, DEFAULT_SECRET_NAME);

    client.get_secret_value(&name).await
}
