//! Jukebox - Playback Control
//!
//! Decides what plays next and tells everyone about it.
//!
//! This crate provides:
//! - Priority queue with jump-the-line insertion
//! - Bounded playback history for reverse navigation
//! - Playback state machine (Stopped, Playing, Paused)
//! - Per-play charging of the logged-in user
//! - Synchronous, failure-isolated subscriber notification
//!
//! # Architecture
//!
//! `jukebox-playback` has no I/O of its own. Song and playlist lookup and
//! user billing come from the [`jukebox_core::Catalog`] and
//! [`jukebox_core::Billing`] collaborators; audio output and UI rendering
//! subscribe to snapshots.
//!
//! # Example
//!
//! ```rust
//! use jukebox_core::types::{AlbumId, ArtistId, PlaylistId, SongId, UserId};
//! use jukebox_core::{Catalog, InMemoryAccounts, InMemoryCatalog, Playlist, Song, User};
//! use jukebox_playback::{PlaybackConfig, PlaybackController, PlaybackState};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(InMemoryCatalog::new());
//! let mut playlist = Playlist::new(PlaylistId::new("p"), "Evening");
//! for id in ["a", "b", "c"] {
//!     let song = catalog.insert_song(Song::new(
//!         SongId::new(id),
//!         id,
//!         AlbumId::new("album"),
//!         ArtistId::new("artist"),
//!     ));
//!     playlist.add_song(song).unwrap();
//! }
//! catalog.insert_playlist(playlist);
//!
//! let accounts = Arc::new(InMemoryAccounts::new());
//! accounts.register(User::new(UserId::new("alice"), "Alice", 10));
//!
//! let mut controller =
//!     PlaybackController::new(catalog.clone(), accounts.clone(), PlaybackConfig::default());
//! controller.login(UserId::new("alice"));
//!
//! let a = catalog.find_song(&SongId::new("a")).unwrap();
//! controller.play(a, &PlaylistId::new("p")).unwrap();
//! assert_eq!(controller.advance().unwrap().id.as_str(), "b");
//! assert_eq!(controller.reverse().unwrap().id.as_str(), "a");
//! assert_eq!(controller.state(), PlaybackState::Playing);
//! assert_eq!(accounts.balance(&UserId::new("alice")), Some(7));
//! ```

mod error;
mod events;
mod history;
mod manager;
mod queue;
mod shared;
mod subscribers;
pub mod types;

// Public exports
pub use error::{PlaybackError, Result, SubscriberError};
pub use events::PlaybackSnapshot;
pub use history::History;
pub use manager::PlaybackController;
pub use queue::Queue;
pub use shared::SharedController;
pub use subscribers::{
    DeliveryFailure, DeliveryReport, PlaybackSubscriber, SubscriberId, SubscriberRegistry,
};
pub use types::{PlaybackConfig, PlaybackState};
