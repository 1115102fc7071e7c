use azaccess_core::{Context, OsEnv};
use azaccess_file_read_tokio::TokioFileRead;
use azaccess_http_send_reqwest::ReqwestHttpSend;

/// Create a context backed by `tokio::fs`, a default `reqwest::Client` and the
/// process environment.
pub fn default_context() -> Context {
    Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}
