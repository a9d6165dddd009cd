//! Playback history tracking
//!
//! Stack of played songs for reverse navigation. Entries leave the stack
//! only when `reverse` consumes them, so any run of k advances can be
//! undone by k reverses.

use jukebox_core::Song;
use std::sync::Arc;

/// Playback history
///
/// Strict LIFO: the most recently recorded song is popped first. Replays are
/// recorded again, there is no deduplication.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Most recent = last
    songs: Vec<Arc<Song>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a song on top of the stack
    pub fn record(&mut self, song: Arc<Song>) {
        self.songs.push(song);
    }

    /// Remove and return the most recently recorded song
    pub fn pop_last(&mut self) -> Option<Arc<Song>> {
        self.songs.pop()
    }

    /// Most recent song without removing it
    pub fn peek(&self) -> Option<&Arc<Song>> {
        self.songs.last()
    }

    /// All songs, oldest first
    pub fn songs(&self) -> &[Arc<Song>] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn clear(&mut self) {
        self.songs.clear();
    }
}
