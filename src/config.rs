//! Resolved, immutable proxy configuration.
//!
//! Built once at startup (see `server::config` for the file/env layers that
//! feed it) and handed to [`AppState::from_config`](crate::server::AppState::from_config).

use std::fmt;
use std::time::Duration;

use crate::cache::{CacheConfig, MAX_TTL};
use crate::catalog::CatalogOptions;
use crate::upstream::Credentials;
use crate::upstream::client::DEFAULT_TIMEOUT;
use crate::{HuginnError, Result};

/// Default listen address.
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:8000";

/// Everything the proxy needs to serve requests.
#[derive(Clone)]
pub struct ProxyConfig {
    /// Upstream base URL as configured, e.g. `https://music.example.com`.
    pub upstream_url: String,
    pub credentials: Credentials,
    /// Shared key clients present in the `X-API-Key` header.
    pub proxy_key: String,
    pub upstream_timeout: Duration,
    pub cache: CacheConfig,
    pub catalog: CatalogOptions,
    pub listen_address: String,
}

impl ProxyConfig {
    /// Create a config with default cache, catalog and network settings.
    pub fn new(
        upstream_url: impl Into<String>,
        credentials: Credentials,
        proxy_key: impl Into<String>,
    ) -> Self {
        Self {
            upstream_url: upstream_url.into(),
            credentials,
            proxy_key: proxy_key.into(),
            upstream_timeout: DEFAULT_TIMEOUT,
            cache: CacheConfig::default(),
            catalog: CatalogOptions::default(),
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
        }
    }

    pub fn upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn catalog(mut self, catalog: CatalogOptions) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn listen_address(mut self, address: impl Into<String>) -> Self {
        self.listen_address = address.into();
        self
    }

    /// Reject configurations the proxy cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.upstream_url.starts_with("http://") || self.upstream_url.starts_with("https://"))
        {
            return Err(HuginnError::Configuration(format!(
                "upstream URL must start with http:// or https://, got '{}'",
                self.upstream_url
            )));
        }
        if self.credentials.username().is_empty() {
            return Err(HuginnError::Configuration(
                "upstream username must not be empty".to_string(),
            ));
        }
        if self.proxy_key.is_empty() {
            return Err(HuginnError::Configuration(
                "proxy API key must not be empty".to_string(),
            ));
        }
        if self.upstream_timeout.is_zero() {
            return Err(HuginnError::Configuration(
                "upstream timeout must be greater than zero".to_string(),
            ));
        }
        if self.cache.ttl > MAX_TTL {
            return Err(HuginnError::Configuration(format!(
                "cache timeout of {}s exceeds the maximum of {}s",
                self.cache.ttl.as_secs(),
                MAX_TTL.as_secs()
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("upstream_url", &self.upstream_url)
            .field("credentials", &self.credentials)
            .field("proxy_key", &"<redacted>")
            .field("upstream_timeout", &self.upstream_timeout)
            .field("cache", &self.cache)
            .field("catalog", &self.catalog)
            .field("listen_address", &self.listen_address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProxyConfig {
        ProxyConfig::new(
            "https://music.example.com",
            Credentials::new("admin", "sesame"),
            "proxy-key",
        )
    }

    #[test]
    fn defaults() {
        let config = config();
        assert_eq!(config.listen_address, "0.0.0.0:8000");
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
        assert_eq!(config.cache.ttl, Duration::from_secs(900));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_http_url() {
        let mut config = config();
        config.upstream_url = "music.example.com".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn rejects_empty_proxy_key() {
        let mut config = config();
        config.proxy_key.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_cache_ttl_beyond_maximum() {
        let config = config().cache(CacheConfig::new().ttl(MAX_TTL + Duration::from_secs(1)));
        let err = config.validate().unwrap_err();
        assert!(matches!(err, HuginnError::Configuration(_)));
        assert!(err.to_string().contains("cache timeout"));

        assert!(self::config().cache(CacheConfig::new().ttl(MAX_TTL)).validate().is_ok());
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("proxy-key"));
        assert!(!rendered.contains("sesame"));
    }
}
