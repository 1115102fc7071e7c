// Env values used to build the client secret credential.
pub const AZURE_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const AZURE_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const AZURE_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const AZURE_AUTHORITY_HOST: &str = "AZURE_AUTHORITY_HOST";

pub const AZURE_PUBLIC_CLOUD: &str = "https://login.microsoftonline.com";

// Well known token scopes.
pub const STORAGE_SCOPE: &str = "https://storage.azure.com/.default";
pub const KEY_VAULT_SCOPE: &str = "https://vault.azure.net/.default";
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";
