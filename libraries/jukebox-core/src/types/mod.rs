mod ids;
mod music;
mod playlist;
mod user;

pub use ids::{AlbumId, ArtistId, PlaylistId, SongId, UserId};
pub use music::{Album, Artist, Song};
pub use playlist::Playlist;
pub use user::{Credits, User};
