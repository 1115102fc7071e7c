use azaccess_core::utils::Redact;
use azaccess_core::{Context, Error, Result};
use std::fmt::{Debug, Formatter};

use crate::constants::*;

/// Config carries all the configuration for the Blob Storage clients.
#[derive(Clone, Default)]
pub struct Config {
    /// `account_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`STORAGE_ACCOUNT_NAME`]
    pub account_name: Option<String>,
    /// `account_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`STORAGE_ACCOUNT_KEY`]
    pub account_key: Option<String>,
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_STORAGE_URL`]
    /// - default to `https://{account_name}.blob.core.windows.net`
    pub endpoint: Option<String>,
    /// `container_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`CONTAINER_NAME`]
    pub container_name: Option<String>,
    /// `subscription_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SUBSCRIPTION_ID`]
    ///
    /// Together with `resource_group_name` it enables account key lookups
    /// through the management plane.
    pub subscription_id: Option<String>,
    /// `resource_group_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`RESOURCE_GROUP_NAME`]
    pub resource_group_name: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("account_name", &self.account_name)
            .field("account_key", &Redact::from(&self.account_key))
            .field("endpoint", &self.endpoint)
            .field("container_name", &self.container_name)
            .field("subscription_id", &self.subscription_id)
            .field("resource_group_name", &self.resource_group_name)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Empty values are treated as unset.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let load = |key: &str| ctx.env_var(key).filter(|v| !v.is_empty());

        self.account_name = self.account_name.or_else(|| load(STORAGE_ACCOUNT_NAME));
        self.account_key = self.account_key.or_else(|| load(STORAGE_ACCOUNT_KEY));
        self.endpoint = self.endpoint.or_else(|| load(AZURE_STORAGE_URL));
        self.container_name = self.container_name.or_else(|| load(CONTAINER_NAME));
        self.subscription_id = self.subscription_id.or_else(|| load(SUBSCRIPTION_ID));
        self.resource_group_name = self
            .resource_group_name
            .or_else(|| load(RESOURCE_GROUP_NAME));

        self
    }

    /// The storage account name, required by every client.
    pub fn account_name(&self) -> Result<&str> {
        self.account_name
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| missing(STORAGE_ACCOUNT_NAME))
    }

    /// The configured container, required by the entry point flows.
    pub fn container_name(&self) -> Result<&str> {
        self.container_name
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| missing(CONTAINER_NAME))
    }

    /// The blob service endpoint without trailing slash.
    pub fn endpoint(&self) -> Result<String> {
        match self.endpoint.as_deref().filter(|v| !v.is_empty()) {
            Some(v) => Ok(v.trim_end_matches('/').to_string()),
            None => Ok(format!(
                "https://{}.blob.core.windows.net",
                self.account_name()?
            )),
        }
    }
}

pub(crate) fn missing(key: &str) -> Error {
    Error::config_invalid(format!("azure storage requires `{key}`"))
        .with_context(format!("key: {key}"))
}
