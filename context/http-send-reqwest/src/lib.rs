//! Reqwest-based HTTP sending implementation for azaccess.
//!
//! `ReqwestHttpSend` implements the `HttpSend` trait from `azaccess_core` so that
//! every service client (token requests, blob calls, vault calls) goes through a
//! shared `reqwest::Client`.
//!
//! ```no_run
//! use azaccess_core::Context;
//! use azaccess_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! let client = reqwest::Client::builder()
//!     .timeout(Duration::from_secs(30))
//!     .build()
//!     .unwrap();
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! ```

use async_trait::async_trait;
use azaccess_core::{Error, HttpSend, Result};
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use reqwest::{Client, Request};

/// Reqwest-based implementation of the `HttpSend` trait.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let method = req.method().clone();
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to convert http request").with_source(e))?;
        debug!("sending {} request to {}", method, req.url().path());

        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| {
                let retryable = e.is_timeout() || e.is_connect();
                Error::unexpected("failed to send http request")
                    .with_source(e)
                    .set_retryable(retryable)
            })?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::unexpected("failed to read http response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}
