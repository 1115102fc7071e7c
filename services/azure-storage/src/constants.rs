use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

// Headers used in azure services.
pub const X_MS_DATE: &str = "x-ms-date";
pub const X_MS_VERSION: &str = "x-ms-version";
pub const X_MS_BLOB_TYPE: &str = "x-ms-blob-type";
pub const X_MS_ERROR_CODE: &str = "x-ms-error-code";

/// Blob service REST version sent with every data plane request.
pub const STORAGE_API_VERSION: &str = "2023-11-03";
/// Signed version used for blob service SAS tokens.
pub const SAS_VERSION: &str = "2022-11-02";
/// Api version of the `Microsoft.Storage` resource provider.
pub const MANAGEMENT_API_VERSION: &str = "2023-05-01";
pub const MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";

// Env values used in azure storage.
pub const STORAGE_ACCOUNT_NAME: &str = "STORAGE_ACCOUNT_NAME";
pub const STORAGE_ACCOUNT_KEY: &str = "STORAGE_ACCOUNT_KEY";
pub const AZURE_STORAGE_URL: &str = "AZURE_STORAGE_URL";
pub const CONTAINER_NAME: &str = "CONTAINER_NAME";
pub const SUBSCRIPTION_ID: &str = "SUBSCRIPTION_ID";
pub const RESOURCE_GROUP_NAME: &str = "RESOURCE_GROUP_NAME";

/// AsciiSet for [Azure Storage](https://learn.microsoft.com/en-us/rest/api/storageservices/naming-and-referencing-containers--blobs--and-metadata)
///
/// Everything except `A-Z a-z 0-9 - _ . ~` is encoded.
pub static AZURE_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Blob names keep their `/` separators in the path.
pub static AZURE_PATH_ENCODE_SET: AsciiSet = AZURE_QUERY_ENCODE_SET.remove(b'/');
