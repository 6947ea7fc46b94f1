//! Upstream dispatch.
//!
//! One `reqwest` client is built at pipeline construction and shared across
//! requests. Dispatch fully buffers the upstream response body before
//! returning, so the client-facing response is never started until the
//! upstream has completely answered; any transport failure therefore aborts
//! the request before anything has been written back.

use crate::error::{ProxyError, Result};
use crate::proxy::target::Target;
use axum::http::{HeaderMap, Method, StatusCode};
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// The fully-built outbound request, mutable only through the
/// decorate-request hook.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub target: Target,
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A complete upstream response, buffered in memory.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// HTTP(S) client for the configured upstream.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http_client: Client,
}

impl UpstreamClient {
    /// Build the shared client with the configured per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .build()
            .map_err(|e| ProxyError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { http_client })
    }

    /// Send the request and collect the entire response body.
    pub async fn dispatch(&self, request: &UpstreamRequest) -> Result<UpstreamResponse> {
        let url = format!("{}{}", request.target.base_url(), request.path);
        debug!(method = %request.method, %url, "dispatching upstream request");

        let response = self
            .http_client
            .request(request.method.clone(), &url)
            .headers(request.headers.clone())
            .body(request.body.clone())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(status = %status, len = body.len(), "upstream response buffered");

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

fn map_transport_error(err: reqwest::Error) -> ProxyError {
    if err.is_timeout() {
        ProxyError::UpstreamTimeout
    } else {
        ProxyError::Upstream(err.to_string())
    }
}
