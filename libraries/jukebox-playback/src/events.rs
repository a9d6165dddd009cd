//! Playback notifications
//!
//! Every state-changing controller operation publishes one immutable
//! [`PlaybackSnapshot`] to the subscriber registry.

use crate::types::PlaybackState;
use jukebox_core::Song;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Immutable view of the controller delivered to subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    /// Playback state after the operation
    pub state: PlaybackState,

    /// Song now loaded, if any
    pub current_song: Option<Arc<Song>>,

    /// Play time of the current song; absent when nothing is loaded
    pub play_time: Option<Duration>,
}

impl PlaybackSnapshot {
    /// Snapshot of a controller with nothing loaded
    pub fn stopped() -> Self {
        Self {
            state: PlaybackState::Stopped,
            current_song: None,
            play_time: None,
        }
    }

    /// Id of the current song, if any
    pub fn song_id(&self) -> Option<&str> {
        self.current_song.as_ref().map(|song| song.id.as_str())
    }
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self::stopped()
    }
}
