//! Single-request HTTP transport.

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// A GET request against the backend or the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRequest {
    /// Fully-qualified URL, query string included.
    pub url: Url,
    /// Bearer credential to attach, if any.
    pub bearer: Option<String>,
}

impl BackendRequest {
    /// Create an unauthenticated GET request.
    pub fn get(url: Url) -> Self {
        Self { url, bearer: None }
    }

    /// Attach a bearer credential.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// A fully-read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    /// Create a response from a status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 429 Too Many Requests.
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// The error for this (non-2xx) status, carrying `message`.
    pub fn status_error(&self, message: impl Into<String>) -> Error {
        let message = message.into();
        match self.status {
            401 | 403 => Error::auth(message),
            404 => Error::not_found(message),
            status => Error::upstream(status, message),
        }
    }
}

/// Performs one HTTP GET. Retries are layered on top by
/// [`RetryingClient`](super::RetryingClient).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request and read the whole body.
    async fn get(&self, request: &BackendRequest) -> Result<TransportResponse>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("signaldesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &BackendRequest) -> Result<TransportResponse> {
        let mut builder = self
            .client
            .get(request.url.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = &request.bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}
