//! The forwarding pipeline.
//!
//! Per request the stages run strictly in sequence: filter check, body
//! buffering, cache lookup, target resolution and header sanitization,
//! upstream dispatch, optional interception, cache write, response assembly.
//! All configuration is captured in an immutable `Proxy` value at build time
//! and shared read-only across concurrently handled requests.

use crate::cache::{cache_key, CacheEntry, CacheMode, CacheStore};
use crate::error::{ProxyError, Result};
use crate::proxy::body;
use crate::proxy::headers;
use crate::proxy::hooks::{DecorateRequestFn, FilterFn, ForwardPathFn, InterceptFn, Intercepted};
use crate::proxy::response::{ProxyResponse, ResponseWriter};
use crate::proxy::target::HostSpec;
use crate::upstream::{UpstreamClient, UpstreamRequest};
use axum::body::Body;
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::{request, Method, Request, StatusCode};
use bytes::Bytes;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BODY_LIMIT: usize = 1024 * 1024; // 1 MiB
const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Snapshot of the inbound request as seen by hooks and the cache key.
#[derive(Debug, Clone)]
pub struct ClientRequest {
    pub method: Method,
    /// Path plus query string, as received.
    pub path: String,
    /// The request identity used for cache keying; equals the received
    /// path+query before any forward-path rewriting.
    pub original_url: String,
    pub headers: HeaderMap,
}

impl ClientRequest {
    pub fn from_parts(parts: &request::Parts) -> Self {
        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());
        Self {
            method: parts.method.clone(),
            original_url: path.clone(),
            path,
            headers: parts.headers.clone(),
        }
    }
}

/// What the pipeline did with one request.
#[derive(Debug)]
pub enum ProxyOutcome {
    /// The upstream (or cache) answered; deliver this response.
    Forwarded(ProxyResponse),
    /// The intercept hook already sent the response itself.
    Handled,
    /// The filter rejected the request; the caller falls through to its
    /// next handler without any forwarding having happened.
    Skipped,
}

/// Builder for a [`Proxy`], mirroring the middleware's configuration
/// surface: host, default headers, hooks, body limit and caching mode.
pub struct ProxyBuilder {
    host: HostSpec,
    default_headers: HeaderMap,
    filter: Option<FilterFn>,
    forward_path: Option<ForwardPathFn>,
    decorate_request: Option<DecorateRequestFn>,
    intercept: Option<InterceptFn>,
    limit: usize,
    caching: CacheMode,
    timeout: Duration,
}

impl ProxyBuilder {
    pub fn new(host: HostSpec) -> Self {
        Self {
            host,
            default_headers: HeaderMap::new(),
            filter: None,
            forward_path: None,
            decorate_request: None,
            intercept: None,
            limit: DEFAULT_BODY_LIMIT,
            caching: CacheMode::default(),
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }

    /// Default headers merged into every upstream request.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.append(name, value);
        self
    }

    /// Predicate deciding whether a request is forwarded; `false` skips the
    /// pipeline entirely.
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&ClientRequest) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Compute the upstream path from the inbound request; defaults to the
    /// inbound path+query.
    pub fn forward_path<F>(mut self, forward_path: F) -> Self
    where
        F: Fn(&ClientRequest) -> String + Send + Sync + 'static,
    {
        self.forward_path = Some(Arc::new(forward_path));
        self
    }

    /// Inspect or replace the fully-built upstream request before dispatch.
    pub fn decorate_request<F>(mut self, decorate: F) -> Self
    where
        F: Fn(UpstreamRequest) -> Result<UpstreamRequest> + Send + Sync + 'static,
    {
        self.decorate_request = Some(Arc::new(decorate));
        self
    }

    /// Rewrite the upstream response body before it reaches the client.
    pub fn intercept<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Bytes, ClientRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Intercepted>> + Send + 'static,
    {
        self.intercept = Some(Arc::new(
            move |bytes, req| -> futures::future::BoxFuture<'static, Result<Intercepted>> {
                Box::pin(hook(bytes, req))
            },
        ));
        self
    }

    /// Inbound body size cap in bytes. Default 1 MiB.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn caching(mut self, mode: CacheMode) -> Self {
        self.caching = mode;
        self
    }

    /// Upstream request timeout; on expiry the dispatch surfaces
    /// [`ProxyError::UpstreamTimeout`] and the in-flight connection is
    /// dropped.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Finalize the configuration. Opens the cache backend (creating the
    /// persistent directory if needed) and builds the shared HTTP client.
    pub async fn build(self) -> Result<Proxy> {
        Ok(Proxy {
            host: self.host,
            default_headers: self.default_headers,
            filter: self.filter,
            forward_path: self.forward_path,
            decorate_request: self.decorate_request,
            intercept: self.intercept,
            limit: self.limit,
            cache: CacheStore::open(self.caching).await?,
            client: UpstreamClient::new(self.timeout)?,
        })
    }
}

/// The configured forwarding middleware. Cheap to clone; all state is
/// shared and immutable apart from the cache contents.
#[derive(Clone)]
pub struct Proxy {
    host: HostSpec,
    default_headers: HeaderMap,
    filter: Option<FilterFn>,
    forward_path: Option<ForwardPathFn>,
    decorate_request: Option<DecorateRequestFn>,
    intercept: Option<InterceptFn>,
    limit: usize,
    cache: CacheStore,
    client: UpstreamClient,
}

impl Proxy {
    /// Builder for a proxy forwarding to a fixed host string.
    pub fn builder(host: &str) -> Result<ProxyBuilder> {
        Ok(ProxyBuilder::new(HostSpec::parse(host)?))
    }

    /// Builder with an explicit (possibly per-request) host specification.
    pub fn builder_with_host(host: HostSpec) -> ProxyBuilder {
        ProxyBuilder::new(host)
    }

    /// Run one inbound request through the pipeline.
    pub async fn handle(&self, request: Request<Body>) -> Result<ProxyOutcome> {
        let (parts, inbound_body) = request.into_parts();
        let request = ClientRequest::from_parts(&parts);

        // The filter short-circuits unconditionally: a rejected request
        // performs no forwarding work at all.
        if let Some(filter) = &self.filter {
            if !filter(&request) {
                debug!(method = %request.method, path = %request.path, "filter rejected request");
                return Ok(ProxyOutcome::Skipped);
            }
        }

        let declared_len = request
            .headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body = body::read_full(inbound_body, self.limit, declared_len).await?;

        let caching = self.cache.enabled();
        let key =
            caching.then(|| cache_key(request.method.as_str(), &request.original_url, &body));

        if let Some(key) = &key {
            if let Some(entry) = self.cache.get(key).await? {
                return Ok(ProxyOutcome::Forwarded(respond_from_cache(entry)?));
            }
        }

        let target = self.host.resolve(&request)?;
        let path = match &self.forward_path {
            Some(forward_path) => forward_path(&request),
            None => request.path.clone(),
        };
        let outbound_headers = headers::sanitize(&self.default_headers, &request.headers, caching);

        let mut upstream_request = UpstreamRequest {
            target,
            method: request.method.clone(),
            path,
            headers: outbound_headers,
            body,
        };
        if let Some(decorate) = &self.decorate_request {
            upstream_request = decorate(upstream_request)?;
        }
        // content-length always reflects the final body, decorated or not.
        upstream_request.headers.insert(
            header::CONTENT_LENGTH,
            HeaderValue::from(upstream_request.body.len()),
        );

        let response = self.client.dispatch(&upstream_request).await?;
        let mut writer = ResponseWriter::new();

        let Some(intercept) = &self.intercept else {
            if let Some(key) = &key {
                let entry = CacheEntry {
                    body: response.body.clone(),
                    content_type: content_type_of(&response.headers),
                };
                self.cache.put(key, entry).await?;
            }
            let out = writer.write(response.status, &response.headers, response.body)?;
            return Ok(ProxyOutcome::Forwarded(out));
        };

        let original_len = response.body.len();
        let intercepted = intercept(response.body.clone(), request.clone()).await?;

        // Once the hook has started the response itself, the promised
        // content-length is fixed; a changed length can no longer be
        // delivered correctly.
        if intercepted.already_sent && intercepted.body.len() != original_len {
            return Err(ProxyError::ContentLengthMismatch {
                promised: original_len,
                actual: intercepted.body.len(),
            });
        }

        // The cache stores what the client actually received: the rewritten
        // body, never the raw upstream bytes.
        if let Some(key) = &key {
            let entry = CacheEntry {
                body: intercepted.body.clone(),
                content_type: content_type_of(&response.headers),
            };
            self.cache.put(key, entry).await?;
        }

        if intercepted.already_sent {
            return Ok(ProxyOutcome::Handled);
        }
        let out = writer.write(response.status, &response.headers, intercepted.body)?;
        Ok(ProxyOutcome::Forwarded(out))
    }
}

fn respond_from_cache(entry: CacheEntry) -> Result<ProxyResponse> {
    let mut headers = HeaderMap::new();
    if let Some(content_type) = &entry.content_type {
        let value = HeaderValue::from_str(content_type)
            .map_err(|_| ProxyError::CacheIo(format!("invalid cached content type '{content_type}'")))?;
        headers.insert(header::CONTENT_TYPE, value);
    }
    ResponseWriter::new().write(StatusCode::OK, &headers, entry.body)
}

fn content_type_of(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
