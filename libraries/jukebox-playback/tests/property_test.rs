//! Property-based tests for the playback controller
//!
//! Uses proptest to verify navigation and notification invariants across
//! random playlists and operation sequences.

use jukebox_core::types::{AlbumId, ArtistId, PlaylistId, SongId};
use jukebox_core::{Catalog, InMemoryAccounts, InMemoryCatalog, Playlist, Song};
use jukebox_playback::{
    PlaybackConfig, PlaybackController, PlaybackError, PlaybackSnapshot, PlaybackState,
    PlaybackSubscriber, SubscriberError,
};
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

// ===== Helpers =====

#[derive(Default)]
struct Counter {
    seen: Mutex<Vec<PlaybackSnapshot>>,
}

impl PlaybackSubscriber for Counter {
    fn update(&self, snapshot: &PlaybackSnapshot) -> Result<(), SubscriberError> {
        self.seen.lock().unwrap().push(snapshot.clone());
        Ok(())
    }
}

fn setup(playlist_len: usize, extra: usize) -> (Arc<InMemoryCatalog>, PlaybackController) {
    let catalog = Arc::new(InMemoryCatalog::new());
    let mut playlist = Playlist::new(PlaylistId::new("p"), "Property");
    for i in 0..playlist_len + extra {
        let song = catalog.insert_song(Song::new(
            SongId::new(format!("s{}", i)),
            format!("Song {}", i),
            AlbumId::new("album"),
            ArtistId::new("artist"),
        ));
        if i < playlist_len {
            playlist.add_song(song).unwrap();
        }
    }
    catalog.insert_playlist(playlist);

    let controller = PlaybackController::new(
        catalog.clone(),
        Arc::new(InMemoryAccounts::new()),
        PlaybackConfig::default(),
    );
    (catalog, controller)
}

fn song(catalog: &InMemoryCatalog, index: usize) -> Arc<Song> {
    catalog.find_song(&SongId::new(format!("s{}", index))).unwrap()
}

// ===== Property Tests =====

proptest! {
    /// Property: a non-empty queue always wins over the active playlist
    #[test]
    fn queue_precedes_playlist(playlist_len in 1usize..10, queued in 1usize..5) {
        let (catalog, mut controller) = setup(playlist_len, queued);
        controller.play(song(&catalog, 0), &PlaylistId::new("p")).unwrap();

        for i in 0..queued {
            controller.enqueue(song(&catalog, playlist_len + i)).unwrap();
        }

        for i in 0..queued {
            let before = controller.queue().len();
            let next = controller.advance().unwrap();
            let expected = format!("s{}", playlist_len + i);
            prop_assert_eq!(next.id.as_str(), expected.as_str());
            prop_assert_eq!(controller.queue().len(), before - 1);
        }
    }

    /// Property: k advances followed by k reverses restore song, playlist and history
    #[test]
    fn reverse_undoes_advance(playlist_len in 1usize..12, start in 0usize..12, k in 1usize..120) {
        let start = start % playlist_len;
        let (catalog, mut controller) = setup(playlist_len, 0);
        controller.play(song(&catalog, start), &PlaylistId::new("p")).unwrap();

        for _ in 0..k {
            controller.advance().unwrap();
        }
        prop_assert_eq!(controller.history().len(), k);

        for _ in 0..k {
            controller.reverse().unwrap();
        }

        let expected = format!("s{}", start);
        prop_assert_eq!(controller.current_song().unwrap().id.as_str(), expected.as_str());
        prop_assert_eq!(controller.active_playlist(), Some(&PlaylistId::new("p")));
        prop_assert!(controller.history().is_empty());
        prop_assert_eq!(controller.reverse().unwrap_err(), PlaybackError::NoHistory);
    }

    /// Property: every state-changing operation produces exactly one matching snapshot
    #[test]
    fn one_snapshot_per_state_change(ops in prop::collection::vec(0u8..6, 1..40)) {
        let (catalog, mut controller) = setup(3, 0);
        let counter = Arc::new(Counter::default());
        controller.subscribe(&counter);

        for op in ops {
            let before_state = controller.state();
            let before_song = controller.current_song().map(|s| s.id.clone());
            let before_count = counter.seen.lock().unwrap().len();

            match op {
                0 => {
                    controller.play(song(&catalog, 0), &PlaylistId::new("p")).unwrap();
                }
                1 => {
                    controller.advance().ok();
                }
                2 => {
                    controller.reverse().ok();
                }
                3 => controller.pause(),
                4 => controller.resume(),
                _ => controller.stop(),
            }

            let seen = counter.seen.lock().unwrap();
            let changed = op < 2
                || controller.state() != before_state
                || controller.current_song().map(|s| s.id.clone()) != before_song
                || seen.len() > before_count;

            if changed {
                prop_assert_eq!(seen.len(), before_count + 1);
                prop_assert_eq!(seen.last().unwrap(), &controller.snapshot());
            } else {
                prop_assert_eq!(seen.len(), before_count);
            }
        }
    }

    /// Property: the state machine never leaves a song loaded while stopped
    #[test]
    fn stopped_means_unloaded(ops in prop::collection::vec(0u8..6, 1..40)) {
        let (catalog, mut controller) = setup(2, 0);

        for op in ops {
            match op {
                0 => {
                    controller.play(song(&catalog, 1), &PlaylistId::new("p")).unwrap();
                }
                1 => {
                    controller.advance().ok();
                }
                2 => {
                    controller.reverse().ok();
                }
                3 => controller.pause(),
                4 => controller.resume(),
                _ => controller.stop(),
            }

            let stopped = controller.state() == PlaybackState::Stopped;
            prop_assert_eq!(stopped, controller.current_song().is_none());
        }
    }
}
