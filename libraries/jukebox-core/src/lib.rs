//! Jukebox Core
//!
//! Domain types and collaborator interfaces shared by the jukebox crates.
//!
//! This crate provides:
//! - **Domain Types**: `Song`, `Album`, `Artist`, `User`, `Playlist`
//! - **Collaborator Traits**: `Catalog` (read-only lookup), `Billing` (user charging)
//! - **In-memory collaborators**: `InMemoryCatalog`, `InMemoryAccounts`
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use jukebox_core::{Catalog, InMemoryCatalog, Playlist, Song};
//! use jukebox_core::types::{AlbumId, ArtistId, PlaylistId, SongId};
//!
//! let catalog = InMemoryCatalog::new();
//! let song = catalog.insert_song(Song::new(
//!     SongId::new("s1"),
//!     "Intro",
//!     AlbumId::new("al1"),
//!     ArtistId::new("ar1"),
//! ));
//!
//! let mut playlist = Playlist::new(PlaylistId::new("p1"), "Evening");
//! playlist.add_song(song).unwrap();
//! catalog.insert_playlist(playlist);
//!
//! assert!(catalog.find_playlist(&PlaylistId::new("p1")).is_some());
//! ```

#![forbid(unsafe_code)]

pub mod accounts;
pub mod catalog;
pub mod error;
pub mod traits;
pub mod types;

pub use accounts::InMemoryAccounts;
pub use catalog::InMemoryCatalog;
pub use error::{CoreError, Result};
pub use traits::{Billing, Catalog};
pub use types::{Album, Artist, Credits, Playlist, Song, User};
