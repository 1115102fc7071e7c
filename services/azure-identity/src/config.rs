use azaccess_core::utils::Redact;
use azaccess_core::Context;
use std::fmt::{Debug, Formatter};

use crate::constants::*;

/// Config carries the raw values a [`crate::ClientSecretCredential`] is built from.
///
/// Nothing is validated here; validation happens when the credential is built so
/// that every missing value is reported with the key it should come from.
#[derive(Clone, Default)]
pub struct Config {
    /// `client_id` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_CLIENT_ID`]
    pub client_id: Option<String>,
    /// `client_secret` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_CLIENT_SECRET`]
    pub client_secret: Option<String>,
    /// `tenant_id` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_TENANT_ID`]
    pub tenant_id: Option<String>,
    /// `authority_host` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_AUTHORITY_HOST`]
    /// - default to `https://login.microsoftonline.com`
    pub authority_host: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &Redact::from(&self.client_secret))
            .field("tenant_id", &self.tenant_id)
            .field("authority_host", &self.authority_host)
            .finish()
    }
}

impl Config {
    /// Fill the unset fields from the context's environment.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if self.client_id.is_none() {
            self.client_id = ctx.env_var(AZURE_CLIENT_ID);
        }
        if self.client_secret.is_none() {
            self.client_secret = ctx.env_var(AZURE_CLIENT_SECRET);
        }
        if self.tenant_id.is_none() {
            self.tenant_id = ctx.env_var(AZURE_TENANT_ID);
        }
        if self.authority_host.is_none() {
            self.authority_host = ctx
                .env_var(AZURE_AUTHORITY_HOST)
                .filter(|v| !v.is_empty());
        }

        self
    }
}
