//! In-memory catalog
//!
//! Holds songs, albums, artists and playlists behind a single `RwLock`.
//! Lookups go through the [`Catalog`] trait; the inherent `insert_*`,
//! `update_playlist` and `remove_playlist` methods are the playlist
//! management surface used by the application.

use crate::error::{CoreError, Result};
use crate::traits::Catalog;
use crate::types::{Album, AlbumId, Artist, ArtistId, Playlist, PlaylistId, Song, SongId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

#[derive(Debug, Default)]
struct CatalogData {
    songs: HashMap<SongId, Arc<Song>>,
    albums: HashMap<AlbumId, Album>,
    artists: HashMap<ArtistId, Artist>,
    playlists: HashMap<PlaylistId, Playlist>,
}

/// Thread-safe in-memory catalog
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    data: RwLock<CatalogData>,
}

impl InMemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&CatalogData) -> T) -> T {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut CatalogData) -> T) -> T {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Add a song, replacing any song with the same id
    ///
    /// Returns the shared handle stored in the catalog.
    pub fn insert_song(&self, song: Song) -> Arc<Song> {
        let song = Arc::new(song);
        self.write(|data| {
            data.songs.insert(song.id.clone(), Arc::clone(&song));
        });
        song
    }

    pub fn insert_album(&self, album: Album) {
        self.write(|data| {
            data.albums.insert(album.id.clone(), album);
        });
    }

    pub fn insert_artist(&self, artist: Artist) {
        self.write(|data| {
            data.artists.insert(artist.id.clone(), artist);
        });
    }

    /// Add or replace a playlist
    pub fn insert_playlist(&self, playlist: Playlist) {
        debug!(playlist = %playlist.id(), songs = playlist.len(), "Playlist stored");
        self.write(|data| {
            data.playlists.insert(playlist.id().clone(), playlist);
        });
    }

    /// Apply an edit to a stored playlist
    pub fn update_playlist<T>(
        &self,
        id: &PlaylistId,
        edit: impl FnOnce(&mut Playlist) -> T,
    ) -> Result<T> {
        self.write(|data| {
            data.playlists
                .get_mut(id)
                .map(edit)
                .ok_or_else(|| CoreError::PlaylistNotFound(id.clone()))
        })
    }

    /// Delete a playlist
    pub fn remove_playlist(&self, id: &PlaylistId) -> Option<Playlist> {
        self.write(|data| data.playlists.remove(id))
    }

    /// Playlists whose name contains `query`
    pub fn search_playlists(&self, query: &str) -> Vec<Playlist> {
        self.read(|data| {
            let mut found: Vec<Playlist> = data
                .playlists
                .values()
                .filter(|playlist| playlist.name().contains(query))
                .cloned()
                .collect();
            found.sort_by(|a, b| a.id().cmp(b.id()));
            found
        })
    }

    /// Songs performed by an artist, ordered by id
    pub fn songs_by_artist(&self, artist_id: &ArtistId) -> Vec<Arc<Song>> {
        self.read(|data| {
            let mut songs: Vec<Arc<Song>> = data
                .songs
                .values()
                .filter(|song| &song.artist_id == artist_id)
                .cloned()
                .collect();
            songs.sort_by(|a, b| a.id.cmp(&b.id));
            songs
        })
    }

    pub fn song_count(&self) -> usize {
        self.read(|data| data.songs.len())
    }

    pub fn playlist_count(&self) -> usize {
        self.read(|data| data.playlists.len())
    }
}

impl Catalog for InMemoryCatalog {
    fn find_song(&self, id: &SongId) -> Option<Arc<Song>> {
        self.read(|data| data.songs.get(id).cloned())
    }

    fn find_playlist(&self, id: &PlaylistId) -> Option<Playlist> {
        self.read(|data| data.playlists.get(id).cloned())
    }

    fn find_album(&self, id: &AlbumId) -> Option<Album> {
        self.read(|data| data.albums.get(id).cloned())
    }

    fn find_artist(&self, id: &ArtistId) -> Option<Artist> {
        self.read(|data| data.artists.get(id).cloned())
    }
}
