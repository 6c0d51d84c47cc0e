//! Pure conversions from upstream payloads to normalised, sorted records.

use crate::types::{
    NormalizedAlbum, NormalizedArtist, NormalizedSong, UNKNOWN_ALBUM, UNKNOWN_ARTIST, UNKNOWN_SONG,
    sort_by_name,
};
use crate::upstream::wire::{AlbumEntry, AlbumListPayload, ArtistsPayload, SongEntry};

/// Flatten every index bucket into one list, sorted by name.
pub fn artists(payload: ArtistsPayload) -> Vec<NormalizedArtist> {
    let mut artists: Vec<NormalizedArtist> = payload
        .artists
        .index
        .into_iter()
        .flat_map(|bucket| bucket.artist)
        .map(|a| NormalizedArtist {
            id: a.id.unwrap_or_default(),
            name: a.name.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
        })
        .collect();
    sort_by_name(&mut artists);
    artists
}

/// Sum of per-bucket artist counts.
pub fn artist_count(payload: &ArtistsPayload) -> u64 {
    payload
        .artists
        .index
        .iter()
        .map(|bucket| bucket.artist.len() as u64)
        .sum()
}

pub fn album(entry: AlbumEntry) -> NormalizedAlbum {
    NormalizedAlbum {
        id: entry.id.unwrap_or_default(),
        name: entry.name.unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
        artist_id: entry.artist_id.unwrap_or_default(),
        artist_name: entry.artist.unwrap_or_default(),
    }
}

/// Normalise the album listing. Upstream order is not trusted; re-sorted by name.
pub fn albums(payload: AlbumListPayload) -> Vec<NormalizedAlbum> {
    let mut albums: Vec<NormalizedAlbum> =
        payload.album_list.album.into_iter().map(album).collect();
    sort_by_name(&mut albums);
    albums
}

/// Sum of the `songCount` fields of an album listing; albums without one count as 0.
pub fn album_song_total(payload: &AlbumListPayload) -> u64 {
    payload
        .album_list
        .album
        .iter()
        .filter_map(|a| a.song_count)
        .sum()
}

/// Normalise one song. `album_id` and `album_name` fill in what the entry lacks.
pub fn song(entry: SongEntry, album_id: Option<&str>, album_name: Option<&str>) -> NormalizedSong {
    NormalizedSong {
        name: entry.title.unwrap_or_else(|| UNKNOWN_SONG.to_string()),
        album_id: entry
            .album_id
            .or_else(|| album_id.map(str::to_string))
            .unwrap_or_default(),
        context: entry
            .album
            .or_else(|| album_name.map(str::to_string))
            .unwrap_or_default(),
    }
}

/// Normalise a flat song list, sorted by name.
pub fn songs(entries: Vec<SongEntry>) -> Vec<NormalizedSong> {
    let mut songs: Vec<NormalizedSong> = entries.into_iter().map(|s| song(s, None, None)).collect();
    sort_by_name(&mut songs);
    songs
}
