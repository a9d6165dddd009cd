/// Core error types for the jukebox
use crate::types::{PlaylistId, SongId, UserId};
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Song is already part of the collection
    #[error("Song {song_id} is already in {collection}")]
    DuplicateSong { song_id: SongId, collection: String },

    /// Playlist could not be resolved
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Song could not be resolved
    #[error("Song not found: {0}")]
    SongNotFound(SongId),

    /// User account does not exist
    #[error("User not found: {0}")]
    UserNotFound(UserId),
}

impl CoreError {
    /// Create a duplicate song error
    pub fn duplicate_song(song_id: SongId, collection: impl Into<String>) -> Self {
        Self::DuplicateSong {
            song_id,
            collection: collection.into(),
        }
    }
}
