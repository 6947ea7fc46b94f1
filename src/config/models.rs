//! Configuration data structures for the http-relay binary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (bind host and port).
    #[serde(default)]
    pub server: ServerConfig,

    /// Forwarding settings: upstream target, headers, limits, caching.
    #[serde(default)]
    pub relay: RelayConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8080`
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings for the forwarding pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Target host to forward every request to, e.g. `https://api.example.com:8443`.
    /// Required; an empty value is rejected at startup.
    #[serde(default)]
    pub upstream: String,

    /// Default headers merged into every upstream request.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Inbound body size cap, as a human-readable size string.
    /// Default: `1mb`
    #[serde(default = "default_limit")]
    pub limit: String,

    /// Upstream request timeout in seconds.
    /// Default: `30`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Response caching settings.
    #[serde(default)]
    pub caching: CachingConfig,
}

/// Settings for the response cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachingConfig {
    /// Whether responses are cached at all.
    /// Default: `false`
    #[serde(default)]
    pub enabled: bool,

    /// Directory for the persistent backend; created if absent.
    /// Default: `./tmp/cache`
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            upstream: String::new(),
            headers: HashMap::new(),
            limit: default_limit(),
            timeout_seconds: default_timeout(),
            caching: CachingConfig::default(),
        }
    }
}

impl Default for CachingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_cache_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_limit() -> String {
    "1mb".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_cache_dir() -> String {
    "./tmp/cache".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
