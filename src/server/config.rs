//! Configuration loading for the huginn daemon.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag, must exist)
//! 2. `~/.huginn/config.toml` (user)
//! 3. `/etc/huginn/config.toml` (system)
//! 4. built-in defaults
//!
//! The daemon then applies environment variables / CLI flags on top.
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.huginn/secrets.toml` (user, must be 0600)
//! 2. `/etc/huginn/secrets.toml` (system, must be 0600)
//!
//! and fall back to `NAVIDROME_API_KEY` / `PROXY_API_KEY`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::catalog::{CatalogOptions, DEFAULT_ALBUM_LIMIT, DEFAULT_SONG_SAMPLE_SIZE};
use crate::config::{DEFAULT_LISTEN_ADDRESS, ProxyConfig};
use crate::types::{SongCount, SongListing};
use crate::upstream::Credentials;
use crate::{HuginnError, Result};

/// Environment variable holding the upstream password / API secret.
pub const ENV_UPSTREAM_SECRET: &str = "NAVIDROME_API_KEY";

/// Environment variable holding the key clients must present.
pub const ENV_PROXY_KEY: &str = "PROXY_API_KEY";

/// File configuration. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub catalog: CatalogSection,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8000).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    DEFAULT_LISTEN_ADDRESS.to_string()
}

/// Upstream server location and account.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// Per-call timeout in seconds (default: 30).
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            username: None,
            timeout_secs: default_upstream_timeout(),
        }
    }
}

fn default_upstream_timeout() -> u64 {
    30
}

/// Response cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Entry lifetime in seconds (default: 900).
    #[serde(default = "default_cache_timeout")]
    pub timeout_secs: u64,
    /// Maximum number of cached routes (default: 64).
    #[serde(default = "default_cache_entries")]
    pub max_entries: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_cache_timeout(),
            max_entries: default_cache_entries(),
        }
    }
}

fn default_cache_timeout() -> u64 {
    900
}

fn default_cache_entries() -> u64 {
    64
}

/// Listing and counting strategies.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSection {
    #[serde(default)]
    pub song_listing: SongListing,
    #[serde(default)]
    pub song_count: SongCount,
    #[serde(default = "default_album_limit")]
    pub album_limit: usize,
    #[serde(default = "default_song_sample_size")]
    pub song_sample_size: usize,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            song_listing: SongListing::default(),
            song_count: SongCount::default(),
            album_limit: default_album_limit(),
            song_sample_size: default_song_sample_size(),
        }
    }
}

fn default_album_limit() -> usize {
    DEFAULT_ALBUM_LIMIT
}

fn default_song_sample_size() -> usize {
    DEFAULT_SONG_SAMPLE_SIZE
}

/// Secrets configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub upstream: Option<UpstreamSecret>,
    #[serde(default)]
    pub proxy: Option<ProxySecret>,
}

/// Upstream account secret (password or API key).
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSecret {
    pub secret: String,
}

/// Key clients present to the proxy.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxySecret {
    pub api_key: String,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, a missing file simply
    /// yields the defaults; the environment may supply everything.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            HuginnError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(HuginnError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".huginn").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/huginn/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Combine with secrets into the immutable runtime configuration.
    ///
    /// Fails with a message naming the missing setting.
    pub fn resolve(self, secrets: &Secrets) -> Result<ProxyConfig> {
        let base_url = self.upstream.base_url.filter(|s| !s.is_empty()).ok_or_else(|| {
            HuginnError::Configuration(
                "upstream base URL not set (NAVIDROME_URL or upstream.base_url)".to_string(),
            )
        })?;
        let username = self.upstream.username.filter(|s| !s.is_empty()).ok_or_else(|| {
            HuginnError::Configuration(
                "upstream username not set (NAVIDROME_USERNAME or upstream.username)".to_string(),
            )
        })?;
        let secret = secrets.upstream_secret().ok_or_else(|| {
            HuginnError::Configuration(format!(
                "upstream secret not set ({ENV_UPSTREAM_SECRET} or secrets upstream.secret)"
            ))
        })?;
        let proxy_key = secrets.proxy_key().ok_or_else(|| {
            HuginnError::Configuration(format!(
                "proxy API key not set ({ENV_PROXY_KEY} or secrets proxy.api_key)"
            ))
        })?;

        let cache = CacheConfig::new()
            .ttl(Duration::from_secs(self.cache.timeout_secs))
            .max_entries(self.cache.max_entries);
        let catalog = CatalogOptions::new()
            .song_listing(self.catalog.song_listing)
            .song_count(self.catalog.song_count)
            .album_limit(self.catalog.album_limit)
            .song_sample_size(self.catalog.song_sample_size);

        let config = ProxyConfig::new(base_url, Credentials::new(username, secret), proxy_key)
            .upstream_timeout(Duration::from_secs(self.upstream.timeout_secs))
            .cache(cache)
            .catalog(catalog)
            .listen_address(self.server.address);
        config.validate()?;
        Ok(config)
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Resolution order:
    /// 1. `~/.huginn/secrets.toml` (if exists, must be 0600)
    /// 2. `/etc/huginn/secrets.toml` (if exists, must be 0600)
    ///
    /// Returns empty secrets if no file exists (env vars are the fallback).
    pub fn load() -> Result<Self> {
        // Try user secrets first
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".huginn").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from(&user_secrets);
            }
        }

        // Try system secrets
        let system_secrets = PathBuf::from("/etc/huginn/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from(&system_secrets);
        }

        // No secrets file, return empty (env vars may provide them)
        Ok(Secrets::default())
    }

    /// Load a specific secrets file after checking its permissions.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            HuginnError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(HuginnError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        // Permission check not available on non-Unix platforms
        Ok(())
    }

    /// Upstream secret, falling back to `NAVIDROME_API_KEY`.
    pub fn upstream_secret(&self) -> Option<String> {
        self.upstream
            .as_ref()
            .map(|s| s.secret.clone())
            .or_else(|| non_empty_env(ENV_UPSTREAM_SECRET))
    }

    /// Proxy key, falling back to `PROXY_API_KEY`.
    pub fn proxy_key(&self) -> Option<String> {
        self.proxy
            .as_ref()
            .map(|s| s.api_key.clone())
            .or_else(|| non_empty_env(ENV_PROXY_KEY))
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}
