//! HTTP transport seam.
//!
//! The journey talks to the registry through [`RegistryTransport`] so that
//! the request orchestration can be exercised without a live registry.
//! Every [`RegistryRequest`] carries a statistics name next to its concrete
//! path, so metrics aggregate per endpoint rather than per identifier.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::error::{ConfigError, TransportError};

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// A request against the registry, relative to the configured base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRequest {
    pub method: Method,
    /// Concrete path and query, e.g. `/api/v3/shell-descriptors/MTEx...`
    pub path: String,
    /// Statistics bucket, e.g. `/api/v3/shell-descriptors/{id}`
    pub name: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl RegistryRequest {
    pub fn get(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            name: name.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post_json(path: impl Into<String>, name: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            name: name.into(),
            headers: vec![("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string())],
            body: Some(body),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[async_trait]
pub trait RegistryTransport: Send + Sync {
    /// Send the request and return the response status.
    ///
    /// Any status is a successful send; judging it is up to the caller.
    async fn send(&self, request: &RegistryRequest) -> Result<StatusCode, TransportError>;
}

/// reqwest-backed transport shared by all simulated users
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(host: &Url, request_timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("registry-load-test/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            base_url: host.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        Url::parse(&url).map_err(|source| TransportError::InvalidUrl { url, source })
    }
}

/// Failure messages key the failure table, so they must not carry the
/// per-iteration URL
fn classify(err: reqwest::Error) -> TransportError {
    let err = err.without_url();
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Request(err)
    }
}

#[async_trait]
impl RegistryTransport for HttpTransport {
    async fn send(&self, request: &RegistryRequest) -> Result<StatusCode, TransportError> {
        let url = self.url_for(&request.path)?;

        let mut builder = self.client.request(request.method.clone(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();

        // Read the body so the pooled connection can be reused
        response.bytes().await.map_err(classify)?;

        Ok(status)
    }
}
