//! Upstream target resolution.
//!
//! A host specification is either a fixed string resolved once at build time
//! or a per-request function evaluated on every inbound request (late
//! binding). Accepted forms: `example.com`, `example.com:9000`,
//! `http://example.com`, `https://api.example.com:8443`.

use crate::error::{ProxyError, Result};
use crate::proxy::pipeline::ClientRequest;
use std::sync::Arc;

/// A resolved upstream endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub hostname: String,
    pub port: u16,
    pub tls: bool,
}

impl Target {
    /// Scheme, host and port as a URL prefix, e.g. `https://api.example.com:8443`.
    pub fn base_url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.hostname, self.port)
    }
}

/// Static or per-request upstream host specification.
#[derive(Clone)]
pub enum HostSpec {
    Static(Target),
    Dynamic(Arc<dyn Fn(&ClientRequest) -> String + Send + Sync>),
}

impl HostSpec {
    /// Parse a fixed host string once, failing fast on invalid input.
    pub fn parse(host: &str) -> Result<Self> {
        Ok(Self::Static(parse_host(host)?))
    }

    /// A host computed from each inbound request.
    pub fn dynamic<F>(host_fn: F) -> Self
    where
        F: Fn(&ClientRequest) -> String + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(host_fn))
    }

    /// Resolve the target for one request. Dynamic specs are re-parsed every
    /// time so a bad per-request host surfaces as a configuration error.
    pub fn resolve(&self, request: &ClientRequest) -> Result<Target> {
        match self {
            Self::Static(target) => Ok(target.clone()),
            Self::Dynamic(host_fn) => parse_host(&host_fn(request)),
        }
    }
}

impl std::fmt::Debug for HostSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(target) => f.debug_tuple("Static").field(target).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Split a host string into `(hostname, port, tls)`.
///
/// The scheme prefix is stripped if present; an explicit `:port` wins,
/// otherwise the port defaults to 443 for `https` specs and 80 for everything
/// else. An empty specification is a configuration error.
pub fn parse_host(host: &str) -> Result<Target> {
    let spec = host.trim();
    if spec.is_empty() {
        return Err(ProxyError::Config("upstream host must not be empty".to_string()));
    }

    let tls = spec.starts_with("https");
    let rest = spec
        .strip_prefix("https://")
        .or_else(|| spec.strip_prefix("http://"))
        .unwrap_or(spec);

    let (hostname, port) = match rest.split_once(':') {
        Some((name, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| ProxyError::Config(format!("invalid upstream port in '{host}'")))?;
            (name, port)
        }
        None => (rest, if tls { 443 } else { 80 }),
    };

    if hostname.is_empty() {
        return Err(ProxyError::Config(format!("invalid upstream host '{host}'")));
    }

    Ok(Target {
        hostname: hostname.to_string(),
        port,
        tls,
    })
}
