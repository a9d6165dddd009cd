//! Catalog entities: songs, albums and artists

use super::ids::{AlbumId, ArtistId, SongId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A song in the catalog
///
/// Immutable once created. The catalog owns songs and hands out `Arc<Song>`
/// references to playlists, the queue and the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Unique song identifier
    pub id: SongId,

    /// Song title
    pub title: String,

    /// Owning album
    pub album_id: AlbumId,

    /// Performing artist
    pub artist_id: ArtistId,

    /// Track length, when known
    #[serde(default)]
    pub duration: Option<Duration>,
}

impl Song {
    /// Create a new song
    pub fn new(
        id: SongId,
        title: impl Into<String>,
        album_id: AlbumId,
        artist_id: ArtistId,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            album_id,
            artist_id,
            duration: None,
        }
    }

    /// Set the track length
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// An album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub artist_id: ArtistId,
    /// Song ids in track order
    #[serde(default)]
    pub song_ids: Vec<SongId>,
}

impl Album {
    /// Create an album with no songs
    pub fn new(id: AlbumId, name: impl Into<String>, artist_id: ArtistId) -> Self {
        Self {
            id,
            name: name.into(),
            artist_id,
            song_ids: Vec::new(),
        }
    }
}

/// An artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
}

impl Artist {
    /// Create an artist
    pub fn new(id: ArtistId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
