//! Error types for playback control

use jukebox_core::types::{PlaylistId, SongId};
use jukebox_core::CoreError;
use thiserror::Error;

/// Playback errors
///
/// All variants are recoverable: the controller stays usable after any of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Song is already in the queue or playlist
    #[error("Song {song_id} is already in {collection}")]
    DuplicateSong { song_id: SongId, collection: String },

    /// Target playlist could not be resolved
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Song could not be resolved from the catalog
    #[error("Song not found: {0}")]
    SongNotFound(SongId),

    /// Neither the queue nor the active playlist has a song to play
    #[error("No next song")]
    NoNextSong,

    /// Reverse requested with empty history
    #[error("No history to go back to")]
    NoHistory,

    /// Any other catalog or billing failure
    #[error(transparent)]
    Core(CoreError),
}

impl From<CoreError> for PlaybackError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DuplicateSong {
                song_id,
                collection,
            } => Self::DuplicateSong {
                song_id,
                collection,
            },
            CoreError::PlaylistNotFound(id) => Self::PlaylistNotFound(id),
            CoreError::SongNotFound(id) => Self::SongNotFound(id),
            other => Self::Core(other),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Failure reported by a subscriber callback
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SubscriberError(pub String);

impl SubscriberError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}
