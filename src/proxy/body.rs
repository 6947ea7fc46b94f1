//! Size-capped inbound body buffering.

use crate::error::{ProxyError, Result};
use axum::body::Body;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};

/// Read the full inbound body into memory, up to `limit` bytes.
///
/// A declared `content-length` above the limit fails fast without reading the
/// stream; otherwise the read is capped so an unbounded stream can never
/// allocate unbounded memory. The pipeline suspends here until the complete
/// body is available or an error fires.
pub async fn read_full(body: Body, limit: usize, declared_len: Option<u64>) -> Result<Bytes> {
    if let Some(len) = declared_len {
        if len > limit as u64 {
            return Err(ProxyError::PayloadTooLarge { limit });
        }
    }

    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            Err(ProxyError::PayloadTooLarge { limit })
        }
        Err(err) => Err(ProxyError::BodyRead(err.to_string())),
    }
}
