//! Normalised library records served to dashboard clients

use serde::{Deserialize, Serialize};

/// Name used when the upstream omits an artist's name.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
/// Name used when the upstream omits an album's name.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
/// Name used when the upstream omits a song's title.
pub const UNKNOWN_SONG: &str = "Unknown Song";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAlbum {
    pub id: String,
    pub name: String,
    pub artist_id: String,
    pub artist_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSong {
    pub name: String,
    pub album_id: String,
    /// Name of the album the song belongs to.
    pub context: String,
}

/// Aggregate library counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub artist_count: u64,
    pub album_count: u64,
    pub song_count: u64,
}

/// Anything listed by name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for NormalizedArtist {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for NormalizedAlbum {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for NormalizedSong {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Stable, case-insensitive ascending sort by name.
pub fn sort_by_name<T: Named>(items: &mut [T]) {
    items.sort_by_cached_key(|item| item.name().to_lowercase());
}

/// A value produced from zero or more upstream calls.
///
/// `complete` is false when at least one of those calls failed and the value
/// was filled in with defaults. Incomplete values are served but not cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub complete: bool,
}

impl<T> Fetched<T> {
    pub fn complete(value: T) -> Self {
        Self {
            value,
            complete: true,
        }
    }

    pub fn degraded(value: T) -> Self {
        Self {
            value,
            complete: false,
        }
    }
}
