// Error types for the http-relay forwarding pipeline

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("request body exceeds the configured limit of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    BodyRead(String),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("upstream request timed out")]
    UpstreamTimeout,

    #[error("intercept hook violated its contract: {0}")]
    InterceptContract(String),

    #[error("content-length already sent promised {promised} bytes, rewritten body has {actual}")]
    ContentLengthMismatch { promised: usize, actual: usize },

    #[error("cache I/O error: {0}")]
    CacheIo(String),

    #[error("internal error: {0}")]
    Internal(String),
}

// Convert ProxyError to HTTP responses for Axum
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ProxyError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error"),
            ProxyError::PayloadTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large")
            }
            ProxyError::BodyRead(_) => (StatusCode::BAD_REQUEST, "body_read_error"),
            ProxyError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            ProxyError::UpstreamTimeout => (StatusCode::GATEWAY_TIMEOUT, "upstream_timeout"),
            ProxyError::InterceptContract(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "intercept_contract_error")
            }
            ProxyError::ContentLengthMismatch { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "content_length_mismatch")
            }
            ProxyError::CacheIo(_) => (StatusCode::INTERNAL_SERVER_ERROR, "cache_io_error"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = json!({
            "type": "error",
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
