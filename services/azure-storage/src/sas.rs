//! Blob service shared access signatures.
//!
//! Reference: <https://learn.microsoft.com/en-us/rest/api/storageservices/create-service-sas>

use azaccess_core::hash;
use azaccess_core::time::{self, DateTime};
use azaccess_core::{Error, Result};
use std::fmt::{Display, Formatter, Write};

use crate::constants::SAS_VERSION;

/// Permissions granted by a blob SAS.
///
/// The default grants read only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobSasPermissions {
    /// Read the content, properties and metadata.
    pub read: bool,
    /// Add a block to an append blob.
    pub add: bool,
    /// Write a new blob.
    pub create: bool,
    /// Create or write content, properties and metadata.
    pub write: bool,
    /// Delete the blob.
    pub delete: bool,
}

impl Default for BlobSasPermissions {
    fn default() -> Self {
        Self::read_only()
    }
}

impl BlobSasPermissions {
    /// Grant read only.
    pub fn read_only() -> Self {
        Self {
            read: true,
            add: false,
            create: false,
            write: false,
            delete: false,
        }
    }

    fn is_empty(&self) -> bool {
        !(self.read || self.add || self.create || self.write || self.delete)
    }
}

/// Rendered in the order Azure requires: `racwd`.
impl Display for BlobSasPermissions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (granted, c) in [
            (self.read, 'r'),
            (self.add, 'a'),
            (self.create, 'c'),
            (self.write, 'w'),
            (self.delete, 'd'),
        ] {
            if granted {
                f.write_char(c)?;
            }
        }
        Ok(())
    }
}

/// Builder for a blob service SAS token signed with the account key.
pub struct BlobSas {
    account: String,
    key: String,
    container: String,
    blob: String,
    permissions: BlobSasPermissions,
    start: Option<DateTime>,
    expiry: DateTime,
    ip: Option<String>,
    protocol: Option<String>,
}

impl BlobSas {
    /// Create a SAS signer for one blob with read only permission.
    pub fn new(
        account: impl Into<String>,
        key: impl Into<String>,
        container: impl Into<String>,
        blob: impl Into<String>,
        expiry: DateTime,
    ) -> Self {
        Self {
            account: account.into(),
            key: key.into(),
            container: container.into(),
            blob: blob.into(),
            permissions: BlobSasPermissions::default(),
            start: None,
            expiry,
            ip: None,
            protocol: None,
        }
    }

    /// Set the granted permissions.
    pub fn with_permissions(mut self, permissions: BlobSasPermissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Set the time the token becomes valid.
    pub fn with_start(mut self, start: DateTime) -> Self {
        self.start = Some(start);
        self
    }

    /// Restrict the token to an IP or IP range like `168.1.5.60-168.1.5.70`.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Restrict the protocol, `https` or `https,http`.
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    // Azure documentation: https://learn.microsoft.com/en-us/rest/api/storageservices/create-service-sas#version-2020-12-06-and-later
    fn string_to_sign(&self) -> String {
        format!(
            "{}\n{}\n{}\n/blob/{}/{}/{}\n\n{}\n{}\n{}\nb\n\n\n\n\n\n\n",
            self.permissions,
            self.start.map(time::format_rfc3339).unwrap_or_default(),
            time::format_rfc3339(self.expiry),
            self.account,
            self.container,
            self.blob,
            self.ip.as_deref().unwrap_or_default(),
            self.protocol.as_deref().unwrap_or_default(),
            SAS_VERSION,
        )
    }

    fn signature(&self) -> Result<String> {
        let decode_content = hash::base64_decode(&self.key)
            .map_err(|e| e.with_context(format!("account: {}", self.account)))?;

        Ok(hash::base64_hmac_sha256(
            &decode_content,
            self.string_to_sign().as_bytes(),
        ))
    }

    fn validate(&self) -> Result<()> {
        if self.container.is_empty() || self.blob.is_empty() {
            return Err(Error::request_invalid(
                "blob sas requires both container and blob name",
            ));
        }
        if self.permissions.is_empty() {
            return Err(Error::request_invalid("blob sas requires a permission"));
        }
        if let Some(start) = self.start {
            if self.expiry <= start {
                return Err(Error::request_invalid("blob sas expiry must be after start")
                    .with_context(format!("start: {}", time::format_rfc3339(start)))
                    .with_context(format!("expiry: {}", time::format_rfc3339(self.expiry))));
            }
        }
        Ok(())
    }

    /// The query pairs of the token, values already url encoded.
    ///
    /// [Example](https://learn.microsoft.com/en-us/rest/api/storageservices/create-service-sas#service-sas-example) from Azure documentation.
    pub fn token(&self) -> Result<Vec<(String, String)>> {
        self.validate()?;

        let mut elements: Vec<(String, String)> = Vec::with_capacity(8);
        if let Some(start) = self.start {
            elements.push(("st".to_string(), urlencoded(time::format_rfc3339(start))));
        }
        elements.push((
            "se".to_string(),
            urlencoded(time::format_rfc3339(self.expiry)),
        ));
        elements.push(("sp".to_string(), self.permissions.to_string()));
        if let Some(ip) = &self.ip {
            elements.push(("sip".to_string(), urlencoded(ip.to_string())));
        }
        if let Some(protocol) = &self.protocol {
            elements.push(("spr".to_string(), urlencoded(protocol.to_string())));
        }
        elements.push(("sv".to_string(), SAS_VERSION.to_string()));
        elements.push(("sr".to_string(), "b".to_string()));
        elements.push(("sig".to_string(), urlencoded(self.signature()?)));

        Ok(elements)
    }

    /// The token as a query string, without the leading `?`.
    pub fn query(&self) -> Result<String> {
        Ok(self
            .token()?
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&"))
    }
}

fn urlencoded(s: String) -> String {
    form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// A blob url carrying a SAS token.
#[derive(Clone)]
pub struct SignedUrl {
    /// The SAS query string, without the leading `?`.
    pub token: String,
    /// `{endpoint}/{container}/{blob}?{token}`.
    pub url: String,
    /// When the token was issued, truncated to whole seconds.
    pub issued_at: DateTime,
    /// When the token stops being accepted.
    pub expires_on: DateTime,
}

impl std::fmt::Debug for SignedUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedUrl")
            .field("url", &azaccess_core::utils::redact_sas_signature(&self.url))
            .field("issued_at", &self.issued_at)
            .field("expires_on", &self.expires_on)
            .finish()
    }
}
