// Configuration module

mod models;

pub use models::*;

use crate::error::{ProxyError, Result};
use config::{Config, Environment, File};
use std::path::PathBuf;

impl AppConfig {
    /// Load configuration with precedence:
    /// 1. Environment variables (highest)
    /// 2. Config file (explicit path, or the default location if present)
    /// 3. Defaults (lowest)
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file_source = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(&Self::default_config_path()).required(false),
        };

        let config = Config::builder()
            .add_source(Config::try_from(&Self::default()).map_err(config_error)?)
            .add_source(file_source)
            // Override with environment variables (prefix: HTTP_RELAY_)
            .add_source(Environment::with_prefix("HTTP_RELAY").separator("__"))
            .build()
            .map_err(config_error)?;

        let config: Self = config.try_deserialize().map_err(config_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Upstream host is the one setting without a usable default.
    pub fn validate(&self) -> Result<()> {
        if self.relay.upstream.trim().is_empty() {
            return Err(ProxyError::Config(
                "relay.upstream must be set to a target host".to_string(),
            ));
        }
        Ok(())
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".http-relay")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}

fn config_error(err: config::ConfigError) -> ProxyError {
    ProxyError::Config(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.relay.limit, "1mb");
        assert_eq!(config.relay.timeout_seconds, 30);
        assert!(!config.relay.caching.enabled);
        assert_eq!(config.relay.caching.dir, "./tmp/cache");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_missing_upstream() {
        let config = AppConfig::default();
        assert!(matches!(config.validate(), Err(ProxyError::Config(_))));

        let mut config = AppConfig::default();
        config.relay.upstream = "example.com".to_string();
        assert!(config.validate().is_ok());
    }
}
