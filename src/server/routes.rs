// HTTP routes configuration

use super::handlers::relay_handler;
use super::middleware::request_id_layers;
use crate::cache::CacheMode;
use crate::config::{AppConfig, RelayConfig};
use crate::error::{ProxyError, Result};
use crate::proxy::Proxy;
use crate::utils::size::parse_size;
use axum::http::header::{HeaderMap, HeaderName, HeaderValue};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<Proxy>,
}

pub async fn create_router(config: &AppConfig) -> Result<Router> {
    let proxy = build_proxy(&config.relay).await?;
    let state = AppState {
        proxy: Arc::new(proxy),
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    // Every path and method funnels into the pipeline.
    let app = Router::new()
        .fallback(relay_handler)
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}

/// Build the forwarding pipeline from the binary's configuration.
pub async fn build_proxy(relay: &RelayConfig) -> Result<Proxy> {
    let caching = if relay.caching.enabled {
        CacheMode::Persistent(relay.caching.dir.clone().into())
    } else {
        CacheMode::Disabled
    };

    Proxy::builder(&relay.upstream)?
        .headers(header_map(&relay.headers)?)
        .limit(parse_size(&relay.limit)?)
        .timeout(Duration::from_secs(relay.timeout_seconds))
        .caching(caching)
        .build()
        .await
}

fn header_map(headers: &std::collections::HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = name
            .parse::<HeaderName>()
            .map_err(|_| ProxyError::Config(format!("invalid header name '{name}'")))?;
        let value = value
            .parse::<HeaderValue>()
            .map_err(|_| ProxyError::Config(format!("invalid header value for '{name}'")))?;
        map.insert(name, value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_build_proxy_from_config() {
        let relay = RelayConfig {
            upstream: "http://localhost:9000".to_string(),
            headers: HashMap::from([("x-api-key".to_string(), "secret".to_string())]),
            ..RelayConfig::default()
        };
        assert!(build_proxy(&relay).await.is_ok());
    }

    #[tokio::test]
    async fn test_build_proxy_rejects_bad_header_name() {
        let relay = RelayConfig {
            upstream: "http://localhost:9000".to_string(),
            headers: HashMap::from([("bad header".to_string(), "x".to_string())]),
            ..RelayConfig::default()
        };
        assert!(matches!(
            build_proxy(&relay).await,
            Err(ProxyError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_build_proxy_rejects_bad_limit() {
        let relay = RelayConfig {
            upstream: "http://localhost:9000".to_string(),
            limit: "plenty".to_string(),
            ..RelayConfig::default()
        };
        assert!(matches!(
            build_proxy(&relay).await,
            Err(ProxyError::Config(_))
        ));
    }
}
