use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// The error type for azaccess operations
#[derive(Error, Debug)]
#[error("{kind}: {message}{}", render_contexts(.contexts))]
pub struct Error {
    kind: ErrorKind,
    message: String,
    contexts: Vec<String>,
    retryable: bool,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Credentials exist but are invalid/malformed or were rejected by the identity provider
    CredentialInvalid,

    /// Permission denied when accessing the resource
    CredentialDenied,

    /// The addressed blob, container or secret does not exist
    NotFound,

    /// The resource exists and the request asked not to overwrite it
    AlreadyExists,

    /// Request cannot be signed (missing required fields, etc.)
    RequestInvalid,

    /// Unexpected errors (network, I/O, service errors, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            contexts: Vec::new(),
            retryable: false,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach a `key: value` style context line to this error.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.contexts.push(context.into());
        self
    }

    /// Mark whether retrying the same operation may succeed.
    pub fn set_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message without contexts.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the attached contexts.
    pub fn contexts(&self) -> &[String] {
        &self.contexts
    }

    /// Whether the failure is likely transient.
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Check if this is a credential error
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::CredentialInvalid | ErrorKind::CredentialDenied
        )
    }

    /// Check if the addressed resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

// Convenience constructors
impl Error {
    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a credential invalid error
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Create a credential denied error
    pub fn credential_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialDenied, message)
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an already exists error
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyExists, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Map a non-success HTTP status returned by an Azure service into an error.
    ///
    /// - `404` becomes [`ErrorKind::NotFound`]
    /// - `409` and `412` become [`ErrorKind::AlreadyExists`]
    /// - `401` and `403` become [`ErrorKind::CredentialDenied`]
    /// - `429` and `5xx` become retryable [`ErrorKind::Unexpected`]
    /// - everything else becomes [`ErrorKind::Unexpected`]
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let kind = match status {
            StatusCode::NOT_FOUND => ErrorKind::NotFound,
            StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => ErrorKind::AlreadyExists,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorKind::CredentialDenied,
            _ => ErrorKind::Unexpected,
        };
        let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();

        Self::new(kind, message)
            .with_context(format!("status: {status}"))
            .set_retryable(retryable)
    }
}

fn render_contexts(contexts: &[String]) -> String {
    if contexts.is_empty() {
        String::new()
    } else {
        format!(" ({})", contexts.join(", "))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::CredentialInvalid => write!(f, "invalid credentials"),
            ErrorKind::CredentialDenied => write!(f, "access denied"),
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::AlreadyExists => write!(f, "already exists"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = if err.kind() == std::io::ErrorKind::NotFound {
            ErrorKind::NotFound
        } else {
            ErrorKind::Unexpected
        };
        Self::new(kind, err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(StatusCode::NOT_FOUND, ErrorKind::NotFound, false; "not found")]
    #[test_case(StatusCode::CONFLICT, ErrorKind::AlreadyExists, false; "conflict")]
    #[test_case(StatusCode::PRECONDITION_FAILED, ErrorKind::AlreadyExists, false; "precondition failed")]
    #[test_case(StatusCode::UNAUTHORIZED, ErrorKind::CredentialDenied, false; "unauthorized")]
    #[test_case(StatusCode::FORBIDDEN, ErrorKind::CredentialDenied, false; "forbidden")]
    #[test_case(StatusCode::TOO_MANY_REQUESTS, ErrorKind::Unexpected, true; "throttled")]
    #[test_case(StatusCode::SERVICE_UNAVAILABLE, ErrorKind::Unexpected, true; "unavailable")]
    #[test_case(StatusCode::BAD_REQUEST, ErrorKind::Unexpected, false; "bad request")]
    fn test_from_status(status: StatusCode, kind: ErrorKind, retryable: bool) {
        let err = Error::from_status(status, "boom");
        assert_eq!(err.kind(), kind);
        assert_eq!(err.is_retryable(), retryable);
    }

    #[test]
    fn test_display_with_contexts() {
        let err = Error::not_found("blob does not exist")
            .with_context("container: photos")
            .with_context("blob: cat.png");

        assert_eq!(
            err.to_string(),
            "not found: blob does not exist (container: photos, blob: cat.png)"
        );
        assert!(err.is_not_found());
        assert!(!err.is_credential_error());
    }
}
