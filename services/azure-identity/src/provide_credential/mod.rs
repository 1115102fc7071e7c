mod client_secret;
pub(crate) use client_secret::request_token;
pub use client_secret::ClientSecretCredentialProvider;
