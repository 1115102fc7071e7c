use azaccess_core::utils::Redact;
use serde::Deserialize;
use std::fmt::{Debug, Formatter};

/// A secret read from Key Vault.
#[derive(Clone)]
pub struct Secret {
    /// The secret name.
    pub name: String,
    /// The secret value.
    pub value: String,
    /// The full identifier, `{vault}/secrets/{name}/{version}`.
    pub id: String,
    /// The version this value belongs to.
    pub version: Option<String>,
    /// The content type set by the writer, if any.
    pub content_type: Option<String>,
    /// Whether the secret is enabled.
    pub enabled: bool,
}

impl Debug for Secret {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("name", &self.name)
            .field("value", &Redact::from(&self.value))
            .field("id", &self.id)
            .field("version", &self.version)
            .field("content_type", &self.content_type)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Reference: <https://learn.microsoft.com/en-us/rest/api/keyvault/secrets/get-secret/get-secret>
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct SecretBundle {
    pub value: String,
    pub id: String,
    pub content_type: Option<String>,
    pub attributes: SecretAttributes,
}

#[derive(Deserialize)]
#[serde(default)]
pub(crate) struct SecretAttributes {
    pub enabled: bool,
}

impl Default for SecretAttributes {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Secret {
    pub(crate) fn from_bundle(name: &str, bundle: SecretBundle) -> Self {
        // `id` looks like `https://myvault.vault.azure.net/secrets/{name}/{version}`.
        let version = bundle
            .id
            .split_once("/secrets/")
            .and_then(|(_, rest)| rest.split_once('/'))
            .map(|(_, version)| version.trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty());

        Self {
            name: name.to_string(),
            value: bundle.value,
            id: bundle.id,
            version,
            content_type: bundle.content_type,
            enabled: bundle.attributes.enabled,
        }
    }
}
