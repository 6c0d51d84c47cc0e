//! Public types for the Huginn API.

mod library;
mod strategy;

pub use library::{
    Fetched, Named, NormalizedAlbum, NormalizedArtist, NormalizedSong, Stats, UNKNOWN_ALBUM,
    UNKNOWN_ARTIST, UNKNOWN_SONG, sort_by_name,
};
pub use strategy::{SongCount, SongListing};
