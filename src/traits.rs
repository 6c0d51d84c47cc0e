//! Core LibrarySource trait

use async_trait::async_trait;

use crate::Result;
use crate::upstream::wire::{
    AlbumListPayload, AlbumPayload, ArtistsPayload, RandomSongsPayload, ScanStatusPayload,
};

/// Raw access to a music library.
///
/// Each method maps to exactly one upstream call. Implementations report
/// transport, status, decoding and envelope failures as errors; turning
/// those into empty results is the [`Catalog`](crate::catalog::Catalog)'s job.
#[async_trait]
pub trait LibrarySource: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Artist index (`getArtists`).
    async fn artists(&self) -> Result<ArtistsPayload>;

    /// Albums in alphabetical order, at most `size` of them (`getAlbumList2`).
    async fn album_list(&self, size: usize) -> Result<AlbumListPayload>;

    /// Random sample of at most `size` songs (`getRandomSongs`).
    async fn random_songs(&self, size: usize) -> Result<RandomSongsPayload>;

    /// One album with its track list (`getAlbum`).
    async fn album(&self, id: &str) -> Result<AlbumPayload>;

    /// Library scan status (`getScanStatus`).
    async fn scan_status(&self) -> Result<ScanStatusPayload>;
}
