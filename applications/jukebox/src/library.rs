//! Catalog construction from configuration
//!
//! Turns the `[library]` section into an [`InMemoryCatalog`]. When nothing is
//! configured the built-in demo library is loaded instead.

use crate::config::{AlbumEntry, ArtistEntry, LibrarySettings, PlaylistEntry, SongEntry};
use crate::error::Result;
use jukebox_core::types::{AlbumId, ArtistId, PlaylistId, SongId};
use jukebox_core::{Album, Artist, Catalog, CoreError, InMemoryCatalog, Playlist, Song};
use std::time::Duration;
use tracing::info;

/// Build a catalog holding every artist, album, song and playlist in `library`
pub fn build_catalog(library: &LibrarySettings) -> Result<InMemoryCatalog> {
    let catalog = InMemoryCatalog::new();

    for artist in &library.artists {
        catalog.insert_artist(Artist::new(
            ArtistId::new(artist.id.as_str()),
            artist.name.as_str(),
        ));
    }

    for entry in &library.albums {
        let mut album = Album::new(
            AlbumId::new(entry.id.as_str()),
            entry.name.as_str(),
            ArtistId::new(entry.artist.as_str()),
        );
        album.song_ids = library
            .songs
            .iter()
            .filter(|song| song.album == entry.id)
            .map(|song| SongId::new(song.id.as_str()))
            .collect();
        catalog.insert_album(album);
    }

    for entry in &library.songs {
        let mut song = Song::new(
            SongId::new(entry.id.as_str()),
            entry.title.as_str(),
            AlbumId::new(entry.album.as_str()),
            ArtistId::new(entry.artist.as_str()),
        );
        if let Some(secs) = entry.duration_secs {
            song = song.with_duration(Duration::from_secs(secs));
        }
        catalog.insert_song(song);
    }

    for entry in &library.playlists {
        let mut playlist =
            Playlist::new(PlaylistId::new(entry.id.as_str()), entry.name.as_str());
        playlist.set_shuffle(entry.shuffle);
        for id in &entry.songs {
            let song_id = SongId::new(id.as_str());
            let song = catalog
                .find_song(&song_id)
                .ok_or(CoreError::SongNotFound(song_id))?;
            playlist.add_song(song)?;
        }
        catalog.insert_playlist(playlist);
    }

    info!(
        songs = catalog.song_count(),
        playlists = catalog.playlist_count(),
        "Library loaded"
    );
    Ok(catalog)
}

/// A small library for trying the jukebox without a config file
pub fn demo_library() -> LibrarySettings {
    let artist = |id: &str, name: &str| ArtistEntry {
        id: id.to_string(),
        name: name.to_string(),
    };
    let album = |id: &str, name: &str, artist: &str| AlbumEntry {
        id: id.to_string(),
        name: name.to_string(),
        artist: artist.to_string(),
    };
    let song = |id: &str, title: &str, album: &str, artist: &str, secs: u64| SongEntry {
        id: id.to_string(),
        title: title.to_string(),
        album: album.to_string(),
        artist: artist.to_string(),
        duration_secs: Some(secs),
    };
    let playlist = |id: &str, name: &str, songs: &[&str], shuffle: bool| PlaylistEntry {
        id: id.to_string(),
        name: name.to_string(),
        songs: songs.iter().map(|s| (*s).to_string()).collect(),
        shuffle,
    };

    LibrarySettings {
        artists: vec![
            artist("lanterns", "The Lanterns"),
            artist("okapi", "Okapi Trio"),
        ],
        albums: vec![
            album("harbour", "Harbour Lights", "lanterns"),
            album("savanna", "Savanna Nights", "okapi"),
        ],
        songs: vec![
            song("tide", "Low Tide", "harbour", "lanterns", 214),
            song("lighthouse", "Lighthouse", "harbour", "lanterns", 187),
            song("fog", "Fog Horn Blues", "harbour", "lanterns", 243),
            song("dusk", "Dusk Walk", "savanna", "okapi", 301),
            song("acacia", "Acacia", "savanna", "okapi", 176),
        ],
        playlists: vec![
            playlist(
                "evening",
                "Evening",
                &["tide", "lighthouse", "fog", "dusk"],
                false,
            ),
            playlist("shuffle", "Shuffle All", &["fog", "dusk", "acacia"], true),
        ],
    }
}
