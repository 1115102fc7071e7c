//! Azure Blob Storage access.
//!
//! This crate provides:
//!
//! - [`BlobClient`]: list, read and upload blobs, create containers, and sign
//!   read only blob urls.
//! - [`StorageManagementClient`]: fetch storage account keys through Azure
//!   Resource Manager.
//! - [`BlobSas`]: blob service shared access signatures.
//! - [`RequestSigner`]: Shared Key and bearer token request authorization.
//!
//! # Example
//!
//! ```rust,no_run
//! use azaccess_azure_identity::ClientSecretCredential;
//! use azaccess_azure_storage::{BlobClient, Config};
//! use azaccess_core::{Context, OsEnv};
//!
//! # async fn example() -> azaccess_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let credential = ClientSecretCredential::from_env(&ctx)?;
//! let config = Config::default().from_env(&ctx);
//!
//! let client = BlobClient::new(ctx, &config, &credential)?;
//! let signed = client.sign_url("samples", "upload_sample.txt").await?;
//! println!("{}", signed.url);
//! # Ok(())
//! # }
//! ```

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod error;

mod provide_credential;
pub use provide_credential::*;

mod sign_request;
pub use sign_request::RequestSigner;

mod sas;
pub use sas::{BlobSas, BlobSasPermissions, SignedUrl};

mod management;
pub use management::{StorageAccountKey, StorageManagementClient};

mod client;
pub use client::{BlobClient, BlobLister, DEFAULT_SAS_EXPIRY};
