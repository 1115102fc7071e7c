//! Microsoft Entra ID (Azure AD) client secret authentication.
//!
//! This crate resolves the application credential shared by the Blob Storage
//! and Key Vault clients:
//!
//! - [`ClientSecretCredential`]: client id, client secret and tenant id, loaded
//!   from configuration and validated up front.
//! - [`ClientSecretCredentialProvider`]: requests OAuth 2.0 access tokens for one
//!   scope, plug it into an [`azaccess_core::Signer`] to cache them.
//! - [`BearerTokenSigner`]: applies the token to outgoing requests.
//!
//! # Example
//!
//! ```no_run
//! use azaccess_azure_identity::{BearerTokenSigner, ClientSecretCredential, KEY_VAULT_SCOPE};
//! use azaccess_core::{Context, OsEnv, Signer};
//!
//! # async fn example() -> azaccess_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let credential = ClientSecretCredential::from_env(&ctx)?;
//!
//! let signer = Signer::new(ctx, credential.provider(KEY_VAULT_SCOPE), BearerTokenSigner);
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{
    AZURE_AUTHORITY_HOST, AZURE_CLIENT_ID, AZURE_CLIENT_SECRET, AZURE_PUBLIC_CLOUD,
    AZURE_TENANT_ID, KEY_VAULT_SCOPE, MANAGEMENT_SCOPE, STORAGE_SCOPE,
};

mod config;
pub use config::Config;

mod credential;
pub use credential::{AccessToken, ClientSecretCredential};

mod provide_credential;
pub use provide_credential::ClientSecretCredentialProvider;

mod sign_request;
pub use sign_request::BearerTokenSigner;
