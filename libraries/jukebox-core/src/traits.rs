/// Collaborator traits consumed by the playback controller
use crate::error::Result;
use crate::types::{
    Album, AlbumId, Artist, ArtistId, Credits, Playlist, PlaylistId, Song, SongId, UserId,
};
use std::sync::Arc;

/// Read-only lookup of catalog entities
///
/// Playlists are returned by value: the controller works on a snapshot of
/// the active playlist and re-resolves it by id whenever it needs the next
/// song, so edits made by playlist management are picked up.
pub trait Catalog: Send + Sync {
    /// Look up a song by id
    fn find_song(&self, id: &SongId) -> Option<Arc<Song>>;

    /// Look up a playlist by id
    fn find_playlist(&self, id: &PlaylistId) -> Option<Playlist>;

    /// Look up an album by id
    fn find_album(&self, id: &AlbumId) -> Option<Album>;

    /// Look up an artist by id
    fn find_artist(&self, id: &ArtistId) -> Option<Artist>;
}

/// User billing
///
/// Implementations must not reject a charge because of an insufficient
/// balance. An error is only expected for accounts that do not exist.
pub trait Billing: Send + Sync {
    /// Deduct `amount` from the user's credit
    fn charge(&self, user: &UserId, amount: Credits) -> Result<()>;
}
