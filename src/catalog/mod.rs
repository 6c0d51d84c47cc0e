//! Library catalog: turns raw upstream payloads into dashboard-ready listings.
//!
//! Every upstream failure is logged and absorbed here. A failed call yields
//! an empty listing (or a zero count) flagged as incomplete via
//! [`Fetched::complete`], so the HTTP layer always answers 200 and the cache
//! layer knows not to keep the result.
//!
//! # Strategies
//!
//! `/songs` and `/stats.songCount` each have more than one reasonable
//! derivation; see [`SongListing`] and [`SongCount`]. The defaults keep the
//! upstream call count constant per request.

pub mod normalize;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::Result;
use crate::traits::LibrarySource;
use crate::types::{
    Fetched, NormalizedAlbum, NormalizedArtist, NormalizedSong, SongCount, SongListing, Stats,
    sort_by_name,
};

/// Default upper bound on albums requested from `getAlbumList2`.
pub const DEFAULT_ALBUM_LIMIT: usize = 10_000;

/// Default size of a `getRandomSongs` sample.
pub const DEFAULT_SONG_SAMPLE_SIZE: usize = 10_000;

/// Catalog behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOptions {
    pub song_listing: SongListing,
    pub song_count: SongCount,
    pub album_limit: usize,
    pub song_sample_size: usize,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            song_listing: SongListing::default(),
            song_count: SongCount::default(),
            album_limit: DEFAULT_ALBUM_LIMIT,
            song_sample_size: DEFAULT_SONG_SAMPLE_SIZE,
        }
    }
}

impl CatalogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn song_listing(mut self, strategy: SongListing) -> Self {
        self.song_listing = strategy;
        self
    }

    pub fn song_count(mut self, strategy: SongCount) -> Self {
        self.song_count = strategy;
        self
    }

    pub fn album_limit(mut self, n: usize) -> Self {
        self.album_limit = n;
        self
    }

    pub fn song_sample_size(mut self, n: usize) -> Self {
        self.song_sample_size = n;
        self
    }
}

/// Normalising front for a [`LibrarySource`].
pub struct Catalog {
    source: Arc<dyn LibrarySource>,
    options: CatalogOptions,
}

impl Catalog {
    pub fn new(source: Arc<dyn LibrarySource>, options: CatalogOptions) -> Self {
        Self { source, options }
    }

    /// All artists, sorted by name.
    pub async fn artists(&self) -> Fetched<Vec<NormalizedArtist>> {
        match self.absorb("getArtists", self.source.artists().await) {
            Some(payload) => Fetched::complete(normalize::artists(payload)),
            None => Fetched::degraded(Vec::new()),
        }
    }

    /// Up to `album_limit` albums, sorted by name.
    pub async fn albums(&self) -> Fetched<Vec<NormalizedAlbum>> {
        let result = self.source.album_list(self.options.album_limit).await;
        match self.absorb("getAlbumList2", result) {
            Some(payload) => Fetched::complete(normalize::albums(payload)),
            None => Fetched::degraded(Vec::new()),
        }
    }

    /// Songs according to the configured [`SongListing`], sorted by name.
    pub async fn songs(&self) -> Fetched<Vec<NormalizedSong>> {
        match self.options.song_listing {
            SongListing::Random => self.random_songs().await,
            SongListing::PerAlbum => self.songs_per_album().await,
        }
    }

    async fn random_songs(&self) -> Fetched<Vec<NormalizedSong>> {
        let result = self.source.random_songs(self.options.song_sample_size).await;
        match self.absorb("getRandomSongs", result) {
            Some(payload) => Fetched::complete(normalize::songs(payload.random_songs.song)),
            None => Fetched::degraded(Vec::new()),
        }
    }

    /// Walk the album listing and fetch each album's tracks, one call at a time.
    ///
    /// A failing album is skipped; the rest are still listed.
    async fn songs_per_album(&self) -> Fetched<Vec<NormalizedSong>> {
        let result = self.source.album_list(self.options.album_limit).await;
        let Some(listing) = self.absorb("getAlbumList2", result) else {
            return Fetched::degraded(Vec::new());
        };

        let mut complete = true;
        let mut songs = Vec::new();
        for entry in listing.album_list.album {
            let Some(id) = entry.id else {
                debug!("skipping album without id");
                continue;
            };
            let Some(detail) = self.absorb("getAlbum", self.source.album(&id).await) else {
                complete = false;
                continue;
            };
            let album_name = detail.album.name.or(entry.name);
            songs.extend(
                detail
                    .album
                    .song
                    .into_iter()
                    .map(|s| normalize::song(s, Some(&id), album_name.as_deref())),
            );
        }

        sort_by_name(&mut songs);
        Fetched { value: songs, complete }
    }

    /// Library counts. Each field is fetched independently and falls back to 0.
    pub async fn stats(&self) -> Fetched<Stats> {
        let mut stats = Stats::default();
        let mut complete = true;

        match self.absorb("getArtists", self.source.artists().await) {
            Some(payload) => stats.artist_count = normalize::artist_count(&payload),
            None => complete = false,
        }

        let result = self.source.album_list(self.options.album_limit).await;
        let album_list = self.absorb("getAlbumList2", result);
        match &album_list {
            Some(payload) => stats.album_count = payload.album_list.album.len() as u64,
            None => complete = false,
        }

        let song_count = match self.options.song_count {
            SongCount::AlbumSum => album_list.as_ref().map(normalize::album_song_total),
            SongCount::ScanStatus => self
                .absorb("getScanStatus", self.source.scan_status().await)
                .map(|payload| payload.scan_status.count.unwrap_or_default()),
            SongCount::RandomSample => {
                let result = self.source.random_songs(self.options.song_sample_size).await;
                self.absorb("getRandomSongs", result)
                    .map(|payload| payload.random_songs.song.len() as u64)
            }
        };
        match song_count {
            Some(count) => stats.song_count = count,
            None => complete = false,
        }

        Fetched {
            value: stats,
            complete,
        }
    }

    /// Log an upstream failure and turn it into "no data".
    fn absorb<T>(&self, endpoint: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(
                    source = self.source.name(),
                    endpoint,
                    error = %e,
                    "upstream call failed, treating as empty"
                );
                None
            }
        }
    }
}
