use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// Env key of the vault url, like `https://myvault.vault.azure.net`.
pub const AZURE_VAULT_URL: &str = "AZURE_VAULT_URL";

/// Key Vault data plane api version.
pub const KEY_VAULT_API_VERSION: &str = "7.4";

/// Secret names and versions are encoded as path segments, keeping the
/// unreserved `A-Z a-z 0-9 - _ . ~` as is.
pub(crate) static SECRET_PATH_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
