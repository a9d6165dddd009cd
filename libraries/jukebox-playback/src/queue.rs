//! Priority queue of user requests
//!
//! The queue is a playlist with two extra moves: jump-the-line insertion at
//! the front, and destructive consumption from the front. The controller
//! always drains it before falling back to the active playlist.
//!
//! ```text
//! Currently Playing: Song A
//! ─────────────────────────────
//! Queue (consumed first):
//!   - Song B (play next)
//!   - Song C (enqueued)
//! ─────────────────────────────
//! Active playlist (next_song after A)
//! ```

use crate::error::Result;
use jukebox_core::types::{PlaylistId, SongId};
use jukebox_core::{Playlist, Song};
use std::sync::Arc;

const QUEUE_ID: &str = "queue";

/// Pending song requests
///
/// Same invariant as [`Playlist`]: no song id appears twice.
#[derive(Debug, Clone)]
pub struct Queue {
    songs: Playlist,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self {
            songs: Playlist::new(PlaylistId::new(QUEUE_ID), "Queue"),
        }
    }

    /// Append a song to the tail
    ///
    /// Fails with `DuplicateSong` if the song is already queued.
    pub fn push_back(&mut self, song: Arc<Song>) -> Result<()> {
        self.songs.add_song(song)?;
        Ok(())
    }

    /// Insert a song at the head, ahead of everything already queued
    ///
    /// A song that is already queued is moved to the head instead of being
    /// duplicated.
    pub fn push_front(&mut self, song: Arc<Song>) {
        self.songs.remove_song(&song.id);
        // Cannot collide: any entry with this id was just removed
        let _ = self.songs.insert_song(0, song);
    }

    /// Remove and return the head
    pub fn pop_front(&mut self) -> Option<Arc<Song>> {
        self.songs.take_first()
    }

    /// Peek at the head without removing
    pub fn peek(&self) -> Option<&Arc<Song>> {
        self.songs.first()
    }

    /// Remove a song by id; absent ids are ignored
    pub fn remove(&mut self, song_id: &SongId) -> Option<Arc<Song>> {
        self.songs.remove_song(song_id)
    }

    pub fn contains(&self, song_id: &SongId) -> bool {
        self.songs.contains(song_id)
    }

    /// Songs in play order
    pub fn songs(&self) -> &[Arc<Song>] {
        self.songs.songs()
    }

    pub fn clear(&mut self) {
        self.songs.clear();
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// The queue viewed as a plain playlist
    pub fn as_playlist(&self) -> &Playlist {
        &self.songs
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}
