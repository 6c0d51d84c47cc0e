//! Huginn - authenticated caching proxy for Subsonic media servers
//!
//! Huginn sits between a dashboard (e.g. Glance) and a Subsonic-compatible
//! server (e.g. Navidrome). It signs upstream calls with salted tokens,
//! flattens the Subsonic payloads into small sorted JSON listings, and keeps
//! each listing in a short-lived cache so dashboards can poll freely.
//!
//! # Example
//!
//! ```rust,no_run
//! use huginn::{Credentials, ProxyConfig, server::{AppState, build_router}};
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     let config = ProxyConfig::new(
//!         "https://music.example.com",
//!         Credentials::new("admin", "secret"),
//!         "dashboard-key",
//!     );
//!     let app = build_router(AppState::from_config(&config)?);
//!
//!     let listener = tokio::net::TcpListener::bind(&config.listen_address).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod server;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod upstream;
mod version;

// Re-export main types at crate root
pub use cache::{CacheConfig, ResponseCache};
pub use catalog::{Catalog, CatalogOptions};
pub use config::ProxyConfig;
pub use error::{HuginnError, Result};
pub use traits::LibrarySource;
pub use upstream::{Credentials, SubsonicClient};
pub use version::{BuildInfo, PKG_VERSION, version_string};

// Re-export all types
pub use types::{
    Fetched, NormalizedAlbum, NormalizedArtist, NormalizedSong, SongCount, SongListing, Stats,
};
