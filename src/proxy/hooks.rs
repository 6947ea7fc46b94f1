//! Caller-supplied pipeline hooks.
//!
//! The interception hook completes by returning exactly one of a rewritten
//! body, an already-sent marker, or an error; the async return value replaces
//! the original callback contract, so a hook cannot complete twice or never.

use crate::error::Result;
use crate::proxy::pipeline::ClientRequest;
use crate::upstream::UpstreamRequest;
use bytes::Bytes;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Outcome of the response interception hook.
#[derive(Debug, Clone)]
pub struct Intercepted {
    /// Final response body, rewritten or passed through unchanged.
    pub body: Bytes,
    /// True when the hook already delivered the response to the client
    /// itself; the pipeline then must not write the body a second time, and
    /// the body length may no longer change.
    pub already_sent: bool,
}

impl Intercepted {
    /// The hook rewrote (or kept) the body; the pipeline delivers it.
    pub fn rewritten(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            already_sent: false,
        }
    }

    /// The hook already sent this body; the pipeline only records it.
    pub fn already_sent(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            already_sent: true,
        }
    }
}

/// Predicate deciding whether a request is forwarded at all.
/// `false` short-circuits the pipeline before any forwarding work.
pub type FilterFn = Arc<dyn Fn(&ClientRequest) -> bool + Send + Sync>;

/// Computes the upstream path from the inbound request.
/// Defaults to the inbound path when absent.
pub type ForwardPathFn = Arc<dyn Fn(&ClientRequest) -> String + Send + Sync>;

/// Receives the fully-built upstream request and may return a replacement.
pub type DecorateRequestFn = Arc<dyn Fn(UpstreamRequest) -> Result<UpstreamRequest> + Send + Sync>;

/// Asynchronous response rewrite hook, invoked with the complete upstream
/// body and a snapshot of the inbound request.
pub type InterceptFn =
    Arc<dyn Fn(Bytes, ClientRequest) -> BoxFuture<'static, Result<Intercepted>> + Send + Sync>;
