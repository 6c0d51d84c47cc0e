//! Serde shapes of the Subsonic JSON payloads consumed by the proxy.
//!
//! Only the fields the catalog reads are modelled. Everything is optional or
//! defaulted: a missing or wrongly typed field is dropped to its default and
//! filled in during normalisation, never fatal to the rest of the payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `{"subsonic-response": {...}}`
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(rename = "subsonic-response")]
    pub response: Option<serde_json::Map<String, serde_json::Value>>,
}

/// `error` object of a failed envelope.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EnvelopeError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Payload of `getArtists`.
#[derive(Debug, Default, Deserialize)]
pub struct ArtistsPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub artists: ArtistIndex,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtistIndex {
    #[serde(default, deserialize_with = "lenient")]
    pub index: Vec<IndexBucket>,
}

/// One letter bucket (`"A"`, `"B"`, `"#"`, ...) of the artist index.
#[derive(Debug, Default, Deserialize)]
pub struct IndexBucket {
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub artist: Vec<ArtistEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtistEntry {
    #[serde(default, deserialize_with = "text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
}

/// Payload of `getAlbumList2`.
#[derive(Debug, Default, Deserialize)]
pub struct AlbumListPayload {
    #[serde(default, rename = "albumList2", deserialize_with = "lenient")]
    pub album_list: AlbumList,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlbumList {
    #[serde(default, deserialize_with = "lenient")]
    pub album: Vec<AlbumEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumEntry {
    #[serde(default, deserialize_with = "text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub artist_id: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub artist: Option<String>,
    #[serde(default, deserialize_with = "count")]
    pub song_count: Option<u64>,
}

/// Payload of `getRandomSongs`.
#[derive(Debug, Default, Deserialize)]
pub struct RandomSongsPayload {
    #[serde(default, rename = "randomSongs", deserialize_with = "lenient")]
    pub random_songs: SongList,
}

#[derive(Debug, Default, Deserialize)]
pub struct SongList {
    #[serde(default, deserialize_with = "lenient")]
    pub song: Vec<SongEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongEntry {
    #[serde(default, deserialize_with = "text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub album_id: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub album: Option<String>,
}

/// Payload of `getAlbum`.
#[derive(Debug, Default, Deserialize)]
pub struct AlbumPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub album: AlbumDetail,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlbumDetail {
    #[serde(default, deserialize_with = "text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub song: Vec<SongEntry>,
}

/// Payload of `getScanStatus`.
#[derive(Debug, Default, Deserialize)]
pub struct ScanStatusPayload {
    #[serde(default, rename = "scanStatus", deserialize_with = "lenient")]
    pub scan_status: ScanStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScanStatus {
    #[serde(default, deserialize_with = "flag")]
    pub scanning: bool,
    #[serde(default, deserialize_with = "count")]
    pub count: Option<u64>,
}

/// Text field (id, name, title). Navidrome sends opaque string ids, the
/// reference Subsonic server sends integers; any other type reads as absent.
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Non-negative count, also accepted as a decimal string.
fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_bool().unwrap_or(false))
}

/// Nested object or list: anything that does not fit its shape reads as empty.
///
/// List elements are decoded one by one so a stray non-object entry is
/// dropped without taking its siblings with it.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: LenientShape,
{
    Ok(T::from_value(Value::deserialize(deserializer)?))
}

trait LenientShape: Sized {
    fn from_value(value: Value) -> Self;
}

impl<T: DeserializeOwned> LenientShape for Vec<T> {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            // Some servers collapse single-element lists into a bare object
            single @ Value::Object(_) => serde_json::from_value(single).into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

macro_rules! lenient_struct {
    ($($ty:ty),*) => {
        $(impl LenientShape for $ty {
            fn from_value(value: Value) -> Self {
                serde_json::from_value(value).unwrap_or_default()
            }
        })*
    };
}

lenient_struct!(ArtistIndex, AlbumList, SongList, AlbumDetail, ScanStatus);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_both_parse() {
        let payload: AlbumListPayload = serde_json::from_value(serde_json::json!({
            "albumList2": {"album": [
                {"id": "al-1", "name": "A", "artistId": 7},
                {"id": 42, "name": "B", "artistId": "ar-2"}
            ]}
        }))
        .unwrap();
        let albums = payload.album_list.album;
        assert_eq!(albums[0].id.as_deref(), Some("al-1"));
        assert_eq!(albums[0].artist_id.as_deref(), Some("7"));
        assert_eq!(albums[1].id.as_deref(), Some("42"));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let payload: ArtistsPayload = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(payload.artists.index.is_empty());

        let payload: RandomSongsPayload =
            serde_json::from_value(serde_json::json!({"randomSongs": {}})).unwrap();
        assert!(payload.random_songs.song.is_empty());
    }

    #[test]
    fn null_id_is_none() {
        let entry: ArtistEntry =
            serde_json::from_value(serde_json::json!({"id": null, "name": "X"})).unwrap();
        assert!(entry.id.is_none());
    }

    #[test]
    fn wrongly_typed_fields_are_dropped_per_field() {
        let payload: AlbumListPayload = serde_json::from_value(serde_json::json!({
            "albumList2": {"album": [
                {"id": "al-1", "name": "Blue", "songCount": 10},
                {"id": "al-2", "name": ["not", "text"], "artist": {"x": 1}, "songCount": "12"},
                {"id": true, "name": "Hejira", "songCount": -3}
            ]}
        }))
        .unwrap();
        let albums = payload.album_list.album;
        assert_eq!(albums.len(), 3);
        assert_eq!(albums[1].id.as_deref(), Some("al-2"));
        assert!(albums[1].name.is_none());
        assert!(albums[1].artist.is_none());
        assert_eq!(albums[1].song_count, Some(12));
        assert!(albums[2].id.is_none());
        assert_eq!(albums[2].song_count, None);
    }

    #[test]
    fn numeric_name_reads_as_text() {
        let payload: ArtistsPayload = serde_json::from_value(serde_json::json!({
            "artists": {"index": [{"name": "#", "artist": [{"id": "ar-1", "name": 1999}]}]}
        }))
        .unwrap();
        assert_eq!(
            payload.artists.index[0].artist[0].name.as_deref(),
            Some("1999")
        );
    }

    #[test]
    fn misshapen_sections_read_as_empty() {
        let payload: ArtistsPayload = serde_json::from_value(serde_json::json!({
            "artists": {"index": [
                {"name": "A", "artist": [{"id": "ar-1", "name": "ABBA"}, "stray", 7]},
                {"name": "B", "artist": null},
                {"name": "C", "artist": {"id": "ar-9", "name": "Can"}}
            ]}
        }))
        .unwrap();
        let buckets = payload.artists.index;
        assert_eq!(buckets[0].artist.len(), 1);
        assert!(buckets[1].artist.is_empty());
        assert_eq!(buckets[2].artist[0].name.as_deref(), Some("Can"));

        let payload: ScanStatusPayload = serde_json::from_value(serde_json::json!({
            "scanStatus": "idle"
        }))
        .unwrap();
        assert!(!payload.scan_status.scanning);
        assert!(payload.scan_status.count.is_none());

        let payload: RandomSongsPayload = serde_json::from_value(serde_json::json!({
            "randomSongs": {"song": 42}
        }))
        .unwrap();
        assert!(payload.random_songs.song.is_empty());
    }
}
