//! HTTP transport seam.
//!
//! The proxy builds [`TransportRequest`]s and interprets [`TransportResponse`]s;
//! a [`Transport`] only moves bytes. [`ReqwestTransport`] is the production
//! implementation.

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

pub use reqwest::{Method, StatusCode};

use crate::error::TransportError;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// A fully shaped request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,

    /// Absolute URL, path segments and query already encoded.
    pub url: Url,

    /// Value for the `Content-Type` header, if a body is sent.
    pub content_type: Option<&'static str>,

    pub body: Option<String>,
}

/// Status and raw body of a response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Sends one request and returns whatever status came back.
///
/// Implementations must not interpret the status and must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// Transport backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with request and connect timeouts.
    pub fn new(timeout: Duration, connect_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Wrap an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self.client.request(request.method, request.url);
        if let Some(content_type) = request.content_type {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}
