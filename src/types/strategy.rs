//! Interchangeable strategies for song listing and song counting

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::HuginnError;

/// How `/songs` enumerates the library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SongListing {
    /// One `getRandomSongs` call. Cheap, but capped and non-deterministic.
    #[default]
    Random,
    /// `getAlbumList2` followed by one `getAlbum` per album. Exhaustive,
    /// at the cost of one sequential upstream call per album.
    PerAlbum,
}

/// How `/stats` derives `songCount`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SongCount {
    /// Sum of `songCount` over the album listing. No extra upstream call.
    #[default]
    AlbumSum,
    /// `count` reported by `getScanStatus`.
    ScanStatus,
    /// Length of a `getRandomSongs` sample.
    RandomSample,
}

impl FromStr for SongListing {
    type Err = HuginnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "per-album" => Ok(Self::PerAlbum),
            other => Err(HuginnError::Configuration(format!(
                "unknown song listing strategy '{other}' (expected 'random' or 'per-album')"
            ))),
        }
    }
}

impl FromStr for SongCount {
    type Err = HuginnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "album-sum" => Ok(Self::AlbumSum),
            "scan-status" => Ok(Self::ScanStatus),
            "random-sample" => Ok(Self::RandomSample),
            other => Err(HuginnError::Configuration(format!(
                "unknown song count strategy '{other}' (expected 'album-sum', 'scan-status' or 'random-sample')"
            ))),
        }
    }
}

impl fmt::Display for SongListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Random => "random",
            Self::PerAlbum => "per-album",
        })
    }
}

impl fmt::Display for SongCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AlbumSum => "album-sum",
            Self::ScanStatus => "scan-status",
            Self::RandomSample => "random-sample",
        })
    }
}
