use async_trait::async_trait;
use azaccess_azure_identity::{ClientSecretCredential, ClientSecretCredentialProvider, STORAGE_SCOPE};
use azaccess_core::{Context, ProvideCredential, Result};

use crate::credential::Credential;

/// Provide bearer tokens for `https://storage.azure.com/.default` from a client
/// secret credential.
#[derive(Clone, Debug)]
pub struct TokenCredentialProvider {
    inner: ClientSecretCredentialProvider,
}

impl TokenCredentialProvider {
    /// Create a provider that requests storage tokens with `credential`.
    pub fn new(credential: &ClientSecretCredential) -> Self {
        Self {
            inner: credential.provider(STORAGE_SCOPE),
        }
    }
}

#[async_trait]
impl ProvideCredential for TokenCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(self
            .inner
            .provide_credential(ctx)
            .await?
            .map(Credential::from))
    }
}
