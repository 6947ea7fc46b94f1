//! Client response assembly with a single-write guard.

use crate::error::{ProxyError, Result};
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

/// Fully-buffered response handed back to the outer framework.
#[derive(Debug)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

/// Assembles the client response exactly once per request.
///
/// Upstream headers are copied verbatim except the framing fields: the body
/// is re-framed from a full buffer, so `transfer-encoding` and `connection`
/// do not survive and `content-length` is recomputed from the final body.
pub struct ResponseWriter {
    sent: bool,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self { sent: false }
    }

    pub fn headers_sent(&self) -> bool {
        self.sent
    }

    /// Build the response. A second write attempt for the same request is an
    /// explicit internal error, never a silent double send.
    pub fn write(
        &mut self,
        status: StatusCode,
        upstream_headers: &HeaderMap,
        body: Bytes,
    ) -> Result<ProxyResponse> {
        if self.sent {
            return Err(ProxyError::Internal(
                "response already written for this request".to_string(),
            ));
        }
        self.sent = true;

        let mut headers = HeaderMap::with_capacity(upstream_headers.len() + 1);
        for (name, value) in upstream_headers {
            if name == header::TRANSFER_ENCODING
                || name == header::CONNECTION
                || name == header::CONTENT_LENGTH
            {
                continue;
            }
            headers.append(name.clone(), value.clone());
        }
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));

        Ok(ProxyResponse {
            status,
            headers,
            body,
        })
    }
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new()
    }
}
