//! Playlists with next-song resolution
//!
//! A playlist is an ordered set of song references. It never owns song data:
//! entries are `Arc<Song>` handles into the catalog.

use super::ids::{PlaylistId, SongId};
use super::music::Song;
use crate::error::{CoreError, Result};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use std::sync::Arc;

/// Ordered song collection
///
/// Invariant: no two entries share a song id.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    id: PlaylistId,
    name: String,
    songs: Vec<Arc<Song>>,
    shuffle: bool,
}

impl Playlist {
    /// Create an empty, non-shuffled playlist
    pub fn new(id: PlaylistId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            songs: Vec::new(),
            shuffle: false,
        }
    }

    pub fn id(&self) -> &PlaylistId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the playlist
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Append a song
    ///
    /// Fails with `DuplicateSong` if a song with the same id is already present.
    pub fn add_song(&mut self, song: Arc<Song>) -> Result<()> {
        if self.contains(&song.id) {
            return Err(CoreError::duplicate_song(
                song.id.clone(),
                format!("playlist {}", self.id),
            ));
        }
        self.songs.push(song);
        Ok(())
    }

    /// Insert a song at `index` (clamped to the end)
    pub fn insert_song(&mut self, index: usize, song: Arc<Song>) -> Result<()> {
        if self.contains(&song.id) {
            return Err(CoreError::duplicate_song(
                song.id.clone(),
                format!("playlist {}", self.id),
            ));
        }
        let index = index.min(self.songs.len());
        self.songs.insert(index, song);
        Ok(())
    }

    /// Remove a song by id
    ///
    /// Absent ids are not an error; `None` is returned.
    pub fn remove_song(&mut self, song_id: &SongId) -> Option<Arc<Song>> {
        let index = self.position(song_id)?;
        Some(self.songs.remove(index))
    }

    /// Remove and return the first song
    pub fn take_first(&mut self) -> Option<Arc<Song>> {
        if self.songs.is_empty() {
            None
        } else {
            Some(self.songs.remove(0))
        }
    }

    /// Resolve the song that follows `current`
    ///
    /// - Shuffle on: a uniformly random entry (may repeat `current`)
    /// - Shuffle off: the entry after `current`, wrapping to the start; the
    ///   first entry if `current` is `None` or not in the playlist
    ///
    /// Returns `None` only for an empty playlist.
    pub fn next_song(&self, current: Option<&SongId>) -> Option<Arc<Song>> {
        self.next_song_with_rng(current, &mut thread_rng())
    }

    /// Same as [`Playlist::next_song`] with a caller-supplied RNG
    pub fn next_song_with_rng<R: Rng + ?Sized>(
        &self,
        current: Option<&SongId>,
        rng: &mut R,
    ) -> Option<Arc<Song>> {
        if self.songs.is_empty() {
            return None;
        }

        if self.shuffle {
            return self.songs.choose(rng).cloned();
        }

        let next_index = current
            .and_then(|id| self.position(id))
            .map_or(0, |index| (index + 1) % self.songs.len());

        self.songs.get(next_index).cloned()
    }

    /// Position of a song id in playlist order
    pub fn position(&self, song_id: &SongId) -> Option<usize> {
        self.songs.iter().position(|song| &song.id == song_id)
    }

    pub fn contains(&self, song_id: &SongId) -> bool {
        self.position(song_id).is_some()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Song>> {
        self.songs.get(index)
    }

    pub fn first(&self) -> Option<&Arc<Song>> {
        self.songs.first()
    }

    /// Songs in playlist order
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

    pub fn is_shuffled(&self) -> bool {
        self.shuffle
    }

    /// Enable or disable random next-song selection
    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlbumId, ArtistId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_song(id: &str) -> Arc<Song> {
        Arc::new(Song::new(
            SongId::new(id),
            format!("Song {}", id),
            AlbumId::new("album"),
            ArtistId::new("artist"),
        ))
    }

    fn abc() -> Playlist {
        let mut playlist = Playlist::new(PlaylistId::new("p"), "Test");
        for id in ["a", "b", "c"] {
            playlist.add_song(create_test_song(id)).unwrap();
        }
        playlist
    }

    #[test]
    fn add_song_rejects_duplicates() {
        let mut playlist = abc();
        let err = playlist.add_song(create_test_song("b")).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateSong { .. }));
        assert_eq!(playlist.len(), 3);
    }

    #[test]
    fn remove_absent_song_is_noop() {
        let mut playlist = abc();
        assert!(playlist.remove_song(&SongId::new("zzz")).is_none());
        assert_eq!(playlist.len(), 3);

        let removed = playlist.remove_song(&SongId::new("b")).unwrap();
        assert_eq!(removed.id.as_str(), "b");
        assert_eq!(playlist.len(), 2);
    }

    #[test]
    fn sequential_next_wraps() {
        let playlist = abc();
        let next = |id: &str| playlist.next_song(Some(&SongId::new(id))).unwrap();

        assert_eq!(next("a").id.as_str(), "b");
        assert_eq!(next("b").id.as_str(), "c");
        assert_eq!(next("c").id.as_str(), "a");
    }

    #[test]
    fn unknown_or_missing_current_starts_at_first() {
        let playlist = abc();
        assert_eq!(playlist.next_song(None).unwrap().id.as_str(), "a");
        assert_eq!(
            playlist
                .next_song(Some(&SongId::new("nope")))
                .unwrap()
                .id
                .as_str(),
            "a"
        );
    }

    #[test]
    fn empty_playlist_has_no_next() {
        let mut playlist = Playlist::new(PlaylistId::new("p"), "Empty");
        assert!(playlist.next_song(None).is_none());

        playlist.set_shuffle(true);
        assert!(playlist.next_song(None).is_none());
    }

    #[test]
    fn shuffled_next_is_member_of_playlist() {
        let mut playlist = abc();
        playlist.set_shuffle(true);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let song = playlist
                .next_song_with_rng(Some(&SongId::new("a")), &mut rng)
                .unwrap();
            assert!(playlist.contains(&song.id));
        }
    }

    #[test]
    fn shuffle_single_song_repeats_it() {
        let mut playlist = Playlist::new(PlaylistId::new("p"), "One");
        playlist.add_song(create_test_song("only")).unwrap();
        playlist.set_shuffle(true);

        let song = playlist.next_song(Some(&SongId::new("only"))).unwrap();
        assert_eq!(song.id.as_str(), "only");
    }

    #[test]
    fn insert_song_clamps_index() {
        let mut playlist = abc();
        playlist.insert_song(99, create_test_song("d")).unwrap();
        assert_eq!(playlist.songs().last().unwrap().id.as_str(), "d");

        playlist.insert_song(0, create_test_song("e")).unwrap();
        assert_eq!(playlist.first().unwrap().id.as_str(), "e");
    }
}
