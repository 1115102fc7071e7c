//! Azure Key Vault secrets.
//!
//! [`SecretClient`] reads secrets with bearer tokens issued to a
//! [`azaccess_azure_identity::ClientSecretCredential`].
//!
//! ```rust,no_run
//! use azaccess_azure_identity::ClientSecretCredential;
//! use azaccess_azure_keyvault::SecretClient;
//! use azaccess_core::{Context, OsEnv};
//!
//! # async fn example() -> azaccess_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let credential = ClientSecretCredential::from_env(&ctx)?;
//!
//! let client = SecretClient::from_env(ctx, &credential)?;
//! let value = client.get_secret_value("db-password").await?;
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{AZURE_VAULT_URL, KEY_VAULT_API_VERSION};

mod secret;
pub use secret::Secret;

mod client;
pub use client::SecretClient;
