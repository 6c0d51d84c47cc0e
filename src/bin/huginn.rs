//! huginn: Subsonic dashboard proxy daemon.
//!
//! Serves simplified, cached library listings over HTTP for dashboard
//! widgets, authenticating clients with a shared key.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::info;

use huginn::server::config::{Config, Secrets};
use huginn::server::{AppState, build_router};
use huginn::{HuginnError, SongCount, SongListing};

/// huginn: authenticated caching proxy for Subsonic servers.
#[derive(Parser)]
#[command(name = "huginn")]
#[command(version = huginn::PKG_VERSION)]
#[command(about = "Authenticated caching proxy for Subsonic media servers")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Upstream base URL, e.g. https://music.example.com
    #[arg(long, env = "NAVIDROME_URL")]
    upstream_url: Option<String>,

    /// Upstream account name.
    #[arg(long, env = "NAVIDROME_USERNAME")]
    upstream_user: Option<String>,

    /// Cache lifetime in seconds.
    #[arg(long, env = "CACHE_TIMEOUT")]
    cache_timeout: Option<u64>,

    /// Address to listen on.
    #[arg(long, env = "LISTEN_ADDRESS")]
    listen: Option<String>,

    /// Song listing strategy: random | per-album.
    #[arg(long, env = "SONG_LISTING")]
    song_listing: Option<SongListing>,

    /// Song count strategy: album-sum | scan-status | random-sample.
    #[arg(long, env = "SONG_COUNT")]
    song_count: Option<SongCount>,
}

impl Args {
    /// Apply flags and environment variables over the file configuration.
    fn apply(self, mut config: Config) -> Config {
        if let Some(url) = self.upstream_url {
            config.upstream.base_url = Some(url);
        }
        if let Some(user) = self.upstream_user {
            config.upstream.username = Some(user);
        }
        if let Some(secs) = self.cache_timeout {
            config.cache.timeout_secs = secs;
        }
        if let Some(address) = self.listen {
            config.server.address = address;
        }
        if let Some(strategy) = self.song_listing {
            config.catalog.song_listing = strategy;
        }
        if let Some(strategy) = self.song_count {
            config.catalog.song_count = strategy;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let file_config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;
    let config = args.apply(file_config).resolve(&secrets)?;

    // Parse address
    let addr: SocketAddr = config
        .listen_address
        .parse()
        .map_err(|e| HuginnError::Configuration(format!("Invalid address: {e}")))?;

    info!(
        version = %huginn::version_string(),
        %addr,
        upstream = %config.upstream_url,
        cache_ttl_secs = config.cache.ttl.as_secs(),
        song_listing = %config.catalog.song_listing,
        song_count = %config.catalog.song_count,
        "huginn starting"
    );

    let state = AppState::from_config(&config)?;
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
