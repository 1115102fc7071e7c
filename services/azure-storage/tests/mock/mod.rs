//! An in-memory stand-in for Entra ID, Azure Resource Manager and the Blob service.

use async_trait::async_trait;
use azaccess_core::{HttpSend, Result};
use bytes::Bytes;
use http::{header, Method, Request, Response, StatusCode};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub const ACCOUNT: &str = "myaccount";
/// base64("key")
pub const ACCOUNT_KEY: &str = "a2V5";
/// base64("management-key")
pub const MANAGEMENT_KEY: &str = "bWFuYWdlbWVudC1rZXk=";

#[derive(Debug, Clone)]
pub struct FakeAzure {
    state: Arc<Mutex<State>>,
}

#[derive(Debug)]
struct State {
    containers: BTreeMap<String, BTreeMap<String, Bytes>>,
    page_size: usize,
    keys: Option<Vec<String>>,
    token_requests: usize,
    list_requests: usize,
    authorizations: Vec<String>,
}

impl FakeAzure {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                containers: BTreeMap::new(),
                page_size: 5000,
                keys: Some(vec![MANAGEMENT_KEY.to_string(), "c2Vjb25k".to_string()]),
                token_requests: 0,
                list_requests: 0,
                authorizations: Vec::new(),
            })),
        }
    }

    pub fn with_page_size(self, page_size: usize) -> Self {
        self.state.lock().unwrap().page_size = page_size;
        self
    }

    pub fn with_container(self, container: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .containers
            .entry(container.to_string())
            .or_default();
        self
    }

    pub fn with_blob(self, container: &str, name: &str, content: &'static [u8]) -> Self {
        self.state
            .lock()
            .unwrap()
            .containers
            .entry(container.to_string())
            .or_default()
            .insert(name.to_string(), Bytes::from_static(content));
        self
    }

    /// `None` makes the storage account unknown to the resource manager.
    pub fn with_keys(self, keys: Option<Vec<String>>) -> Self {
        self.state.lock().unwrap().keys = keys;
        self
    }

    pub fn has_container(&self, container: &str) -> bool {
        self.state.lock().unwrap().containers.contains_key(container)
    }

    pub fn token_requests(&self) -> usize {
        self.state.lock().unwrap().token_requests
    }

    pub fn list_requests(&self) -> usize {
        self.state.lock().unwrap().list_requests
    }

    /// The scheme of every authorization header the data planes received.
    pub fn auth_schemes(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .authorizations
            .iter()
            .map(|v| v.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }

    fn token(&self) -> Response<Bytes> {
        self.state.lock().unwrap().token_requests += 1;
        json(
            StatusCode::OK,
            r#"{"token_type":"Bearer","expires_in":3599,"access_token":"fake-token"}"#.to_string(),
        )
    }

    fn list_keys(&self, req: &Request<Bytes>) -> Response<Bytes> {
        if req.method() != Method::POST || !req.uri().path().ends_with("/listKeys") {
            return json(StatusCode::BAD_REQUEST, "{}".to_string());
        }

        match &self.state.lock().unwrap().keys {
            None => json(
                StatusCode::NOT_FOUND,
                r#"{"error":{"code":"ResourceNotFound","message":"The Resource 'Microsoft.Storage/storageAccounts/myaccount' under resource group 'rg' was not found."}}"#.to_string(),
            ),
            Some(keys) => {
                let keys = keys
                    .iter()
                    .enumerate()
                    .map(|(i, v)| {
                        format!(
                            r#"{{"keyName":"key{}","value":"{}","permissions":"FULL"}}"#,
                            i + 1,
                            v
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                json(StatusCode::OK, format!(r#"{{"keys":[{keys}]}}"#))
            }
        }
    }

    fn blob(&self, req: Request<Bytes>) -> Response<Bytes> {
        let (parts, body) = req.into_parts();
        let path = percent_encoding::percent_decode_str(parts.uri.path())
            .decode_utf8_lossy()
            .to_string();
        let (container, name) = match path.trim_start_matches('/').split_once('/') {
            Some((c, n)) => (c.to_string(), Some(n.to_string())),
            None => (path.trim_start_matches('/').to_string(), None),
        };
        let query: BTreeMap<String, String> = form_urlencoded::parse(
            parts.uri.query().unwrap_or_default().as_bytes(),
        )
        .into_owned()
        .collect();

        let mut state = self.state.lock().unwrap();
        match (name, parts.method.as_str(), query.get("comp").map(String::as_str)) {
            (None, "GET", Some("list")) => {
                state.list_requests += 1;
                let page_size = state.page_size;
                let Some(blobs) = state.containers.get(&container) else {
                    return storage_error(StatusCode::NOT_FOUND, "ContainerNotFound");
                };
                let marker = query.get("marker").cloned().unwrap_or_default();
                let mut names = blobs.keys().filter(|k| **k >= marker);
                let page: Vec<_> = names.by_ref().take(page_size).cloned().collect();
                let next = names.next().cloned().unwrap_or_default();
                list_response(&container, &page, &next)
            }
            (None, "PUT", None) => {
                if state.containers.contains_key(&container) {
                    return storage_error(StatusCode::CONFLICT, "ContainerAlreadyExists");
                }
                state.containers.insert(container, BTreeMap::new());
                empty(StatusCode::CREATED)
            }
            (None, "HEAD", None) => {
                if state.containers.contains_key(&container) {
                    empty(StatusCode::OK)
                } else {
                    let mut resp = empty(StatusCode::NOT_FOUND);
                    resp.headers_mut()
                        .insert("x-ms-error-code", "ContainerNotFound".parse().unwrap());
                    resp
                }
            }
            (Some(name), "GET", None) => match state.containers.get(&container) {
                None => storage_error(StatusCode::NOT_FOUND, "ContainerNotFound"),
                Some(blobs) => match blobs.get(&name) {
                    None => storage_error(StatusCode::NOT_FOUND, "BlobNotFound"),
                    Some(content) => Response::builder()
                        .status(StatusCode::OK)
                        .body(content.clone())
                        .unwrap(),
                },
            },
            (Some(name), "PUT", None) => {
                let length: usize = parts.headers[header::CONTENT_LENGTH]
                    .to_str()
                    .unwrap()
                    .parse()
                    .unwrap();
                assert_eq!(length, body.len(), "content-length must match the body");
                assert_eq!(parts.headers["x-ms-blob-type"], "BlockBlob");

                let if_none_match = parts.headers.contains_key(header::IF_NONE_MATCH);
                let Some(blobs) = state.containers.get_mut(&container) else {
                    return storage_error(StatusCode::NOT_FOUND, "ContainerNotFound");
                };
                if if_none_match && blobs.contains_key(&name) {
                    return storage_error(StatusCode::CONFLICT, "BlobAlreadyExists");
                }
                blobs.insert(name, body);
                empty(StatusCode::CREATED)
            }
            _ => storage_error(StatusCode::BAD_REQUEST, "UnsupportedHttpVerb"),
        }
    }
}

#[async_trait]
impl HttpSend for FakeAzure {
    async fn http_send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        let host = req.uri().host().unwrap_or_default().to_string();
        if host == "login.microsoftonline.com" {
            return Ok(self.token());
        }

        let Some(authorization) = req.headers().get(header::AUTHORIZATION) else {
            return Ok(storage_error(StatusCode::FORBIDDEN, "NoAuthenticationInformation"));
        };
        let authorization = authorization.to_str().unwrap().to_string();
        self.state.lock().unwrap().authorizations.push(authorization);

        if host == "management.azure.com" {
            return Ok(self.list_keys(&req));
        }
        assert!(req.headers().contains_key("x-ms-version"));
        assert!(req.headers().contains_key("x-ms-date"));
        Ok(self.blob(req))
    }
}

fn empty(status: StatusCode) -> Response<Bytes> {
    Response::builder().status(status).body(Bytes::new()).unwrap()
}

fn json(status: StatusCode, body: String) -> Response<Bytes> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Bytes::from(body))
        .unwrap()
}

fn storage_error(status: StatusCode, code: &str) -> Response<Bytes> {
    Response::builder()
        .status(status)
        .header("x-ms-error-code", code)
        .body(Bytes::from(format!(
            r#"<?xml version="1.0" encoding="utf-8"?><Error><Code>{code}</Code><Message>fake error</Message></Error>"#
        )))
        .unwrap()
}

fn list_response(container: &str, names: &[String], next: &str) -> Response<Bytes> {
    let blobs: String = names
        .iter()
        .map(|n| {
            format!(
                "<Blob><Name>{}</Name><Properties><BlobType>BlockBlob</BlobType></Properties></Blob>",
                n.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
            )
        })
        .collect();
    let body = format!(
        r#"<?xml version="1.0" encoding="utf-8"?><EnumerationResults ServiceEndpoint="https://myaccount.blob.core.windows.net/" ContainerName="{container}"><Blobs>{blobs}</Blobs><NextMarker>{next}</NextMarker></EnumerationResults>"#
    );
    Response::builder()
        .status(StatusCode::OK)
        .body(Bytes::from(body))
        .unwrap()
}
