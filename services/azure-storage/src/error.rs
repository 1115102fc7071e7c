use azaccess_core::Error;
use bytes::Bytes;
use http::Response;
use quick_xml::de;
use serde::Deserialize;

use crate::constants::X_MS_ERROR_CODE;

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct StorageErrorResponse {
    code: String,
    message: String,
}

/// Convert a failed Blob service response into an [`Error`].
///
/// The service reports `<Error><Code>..</Code><Message>..</Message></Error>`,
/// HEAD responses only carry the `x-ms-error-code` header.
pub(crate) fn parse_error(resp: Response<Bytes>) -> Error {
    let (parts, body) = resp.into_parts();

    let detail: StorageErrorResponse =
        de::from_str(&String::from_utf8_lossy(&body)).unwrap_or_default();
    let code = if detail.code.is_empty() {
        parts
            .headers
            .get(X_MS_ERROR_CODE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    } else {
        detail.code
    };

    let message = if code.is_empty() {
        format!("blob service returned {}", parts.status)
    } else {
        format!("blob service returned {code}")
    };

    let mut err = Error::from_status(parts.status, message);
    if !detail.message.is_empty() {
        err = err.with_context(format!("message: {}", detail.message.trim()));
    }
    err
}

/// The error code of a failed Blob service response, if the service sent one.
pub(crate) fn error_code(resp: &Response<Bytes>) -> Option<String> {
    if let Some(code) = resp
        .headers()
        .get(X_MS_ERROR_CODE)
        .and_then(|v| v.to_str().ok())
    {
        return Some(code.to_string());
    }

    de::from_str::<StorageErrorResponse>(&String::from_utf8_lossy(resp.body()))
        .ok()
        .map(|v| v.code)
        .filter(|v| !v.is_empty())
}
