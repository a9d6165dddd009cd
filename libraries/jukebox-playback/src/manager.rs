//! Playback controller - core orchestration
//!
//! Coordinates the queue, the active playlist, history, billing and
//! subscriber notification.

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackSnapshot,
    history::History,
    queue::Queue,
    subscribers::{DeliveryReport, PlaybackSubscriber, SubscriberId, SubscriberRegistry},
    types::{PlaybackConfig, PlaybackState},
};
use jukebox_core::types::{PlaylistId, SongId, UserId};
use jukebox_core::{Billing, Catalog, Song};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Mutable session data owned by the controller
#[derive(Debug, Clone, Default)]
struct Session {
    active_playlist: Option<PlaylistId>,
    current_song: Option<Arc<Song>>,
    play_time: Duration,
    user: Option<UserId>,
}

/// Central playback control
///
/// State machine over `Stopped` (initial), `Playing` and `Paused`:
/// - `play` starts a song from a resolvable playlist and charges the user
/// - `advance` drains the queue first, then asks the active playlist
/// - `reverse` walks back through history, re-queueing the current song
/// - `pause`, `resume` and `stop` change state without picking a song
///
/// Every state change is published to subscribers before the call returns.
/// Errors never leave the session half-updated.
pub struct PlaybackController {
    catalog: Arc<dyn Catalog>,
    billing: Arc<dyn Billing>,
    config: PlaybackConfig,

    // State
    state: PlaybackState,
    session: Session,

    // Queue and history
    queue: Queue,
    history: History,

    // Observers
    subscribers: SubscriberRegistry,
    last_delivery: Option<DeliveryReport>,
}

impl PlaybackController {
    /// Create a stopped controller with empty queue and history
    pub fn new(
        catalog: Arc<dyn Catalog>,
        billing: Arc<dyn Billing>,
        config: PlaybackConfig,
    ) -> Self {
        Self {
            catalog,
            billing,
            history: History::new(),
            config,
            state: PlaybackState::Stopped,
            session: Session::default(),
            queue: Queue::new(),
            subscribers: SubscriberRegistry::new(),
            last_delivery: None,
        }
    }

    // ===== Session =====

    /// Set the user charged for subsequent plays
    pub fn login(&mut self, user: UserId) {
        info!(user = %user, "User logged in");
        self.session.user = Some(user);
    }

    /// Clear the session user; plays are free until the next login
    pub fn logout(&mut self) -> Option<UserId> {
        let user = self.session.user.take();
        if let Some(user) = &user {
            info!(user = %user, "User logged out");
        }
        user
    }

    // ===== Playback control =====

    /// Play `song` with `playlist_id` as the active playlist
    ///
    /// Allowed from any state. Resets play time and charges the logged-in
    /// user once.
    pub fn play(&mut self, song: Arc<Song>, playlist_id: &PlaylistId) -> Result<()> {
        let playlist = self
            .catalog
            .find_playlist(playlist_id)
            .ok_or_else(|| PlaybackError::PlaylistNotFound(playlist_id.clone()))?;

        self.session.active_playlist = Some(playlist.id().clone());
        self.start(song);
        Ok(())
    }

    /// Resolve both ids through the catalog, then [`play`](Self::play)
    pub fn play_by_id(&mut self, song_id: &SongId, playlist_id: &PlaylistId) -> Result<()> {
        let song = self.find_song(song_id)?;
        self.play(song, playlist_id)
    }

    /// Move to the next song
    ///
    /// The queue always wins over the active playlist. The outgoing song is
    /// recorded into history. When neither source yields a song the
    /// controller stops and `NoNextSong` is returned.
    pub fn advance(&mut self) -> Result<Arc<Song>> {
        let Some(next) = self.resolve_next() else {
            debug!("Nothing left in queue or playlist");
            self.halt();
            return Err(PlaybackError::NoNextSong);
        };

        if let Some(outgoing) = self.session.current_song.take() {
            self.history.record(outgoing);
        }
        self.start(Arc::clone(&next));
        Ok(next)
    }

    /// Go back to the most recently played song
    ///
    /// The current song is pushed to the front of the queue so the next
    /// `advance` returns to it. Fails with `NoHistory`, changing nothing, if
    /// history is empty.
    pub fn reverse(&mut self) -> Result<Arc<Song>> {
        let previous = self.history.pop_last().ok_or(PlaybackError::NoHistory)?;

        if let Some(current) = self.session.current_song.take() {
            self.queue.push_front(current);
        }
        self.start(Arc::clone(&previous));
        Ok(previous)
    }

    /// Pause playback, freezing the play-time clock
    ///
    /// No-op unless playing.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            debug!(state = %self.state, "Pause ignored");
            return;
        }
        self.state = PlaybackState::Paused;
        self.publish();
    }

    /// Resume a paused song without charging again
    ///
    /// No-op unless paused.
    pub fn resume(&mut self) {
        if self.state != PlaybackState::Paused {
            debug!(state = %self.state, "Resume ignored");
            return;
        }
        self.state = PlaybackState::Playing;
        self.publish();
    }

    /// Stop playback and unload the current song
    ///
    /// The active playlist, queue and history are kept. No-op when already
    /// stopped.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        self.halt();
    }

    /// Advance the play-time clock by `elapsed`
    ///
    /// Driven by the hosting platform. Ignored unless playing.
    pub fn tick(&mut self, elapsed: Duration) {
        if self.state == PlaybackState::Playing {
            self.session.play_time = self.session.play_time.saturating_add(elapsed);
        }
    }

    // ===== Queue =====

    /// Append a song to the queue tail
    pub fn enqueue(&mut self, song: Arc<Song>) -> Result<()> {
        debug!(song = %song.id, "Enqueued");
        self.queue.push_back(song)
    }

    /// Resolve a song id and [`enqueue`](Self::enqueue) it
    pub fn enqueue_by_id(&mut self, song_id: &SongId) -> Result<()> {
        let song = self.find_song(song_id)?;
        self.enqueue(song)
    }

    /// Put a song at the head of the queue so it plays next
    pub fn play_next(&mut self, song: Arc<Song>) {
        debug!(song = %song.id, "Queued to play next");
        self.queue.push_front(song);
    }

    /// Drop all pending queue entries
    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    // ===== Subscribers =====

    /// Register an observer; see [`SubscriberRegistry::subscribe`]
    pub fn subscribe<S: PlaybackSubscriber + 'static>(
        &mut self,
        subscriber: &Arc<S>,
    ) -> SubscriberId {
        self.subscribers.subscribe(subscriber)
    }

    /// Register a type-erased observer
    pub fn subscribe_dyn(&mut self, subscriber: &Arc<dyn PlaybackSubscriber>) -> SubscriberId {
        self.subscribers.subscribe_dyn(subscriber)
    }

    /// Remove an observer; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    // ===== Queries =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_song(&self) -> Option<&Arc<Song>> {
        self.session.current_song.as_ref()
    }

    pub fn active_playlist(&self) -> Option<&PlaylistId> {
        self.session.active_playlist.as_ref()
    }

    pub fn play_time(&self) -> Duration {
        self.session.play_time
    }

    pub fn logged_in_user(&self) -> Option<&UserId> {
        self.session.user.as_ref()
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Whether `advance` would find a song
    pub fn has_next(&self) -> bool {
        !self.queue.is_empty() || self.active_playlist_len() > 0
    }

    /// Whether `reverse` would find a song
    pub fn has_previous(&self) -> bool {
        !self.history.is_empty()
    }

    /// Report from the most recent notification fan-out
    pub fn last_delivery(&self) -> Option<&DeliveryReport> {
        self.last_delivery.as_ref()
    }

    /// Current state as delivered to subscribers
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let current_song = self.session.current_song.clone();
        let play_time = current_song.as_ref().map(|_| self.session.play_time);
        PlaybackSnapshot {
            state: self.state,
            current_song,
            play_time,
        }
    }

    // ===== Internals =====

    fn find_song(&self, song_id: &SongId) -> Result<Arc<Song>> {
        self.catalog
            .find_song(song_id)
            .ok_or_else(|| PlaybackError::SongNotFound(song_id.clone()))
    }

    fn resolve_next(&mut self) -> Option<Arc<Song>> {
        if let Some(song) = self.queue.pop_front() {
            return Some(song);
        }

        let playlist_id = self.session.active_playlist.as_ref()?;
        let Some(playlist) = self.catalog.find_playlist(playlist_id) else {
            warn!(playlist = %playlist_id, "Active playlist no longer exists");
            return None;
        };

        let current = self.session.current_song.as_ref().map(|song| &song.id);
        playlist.next_song(current)
    }

    fn active_playlist_len(&self) -> usize {
        self.session
            .active_playlist
            .as_ref()
            .and_then(|id| self.catalog.find_playlist(id))
            .map_or(0, |playlist| playlist.len())
    }

    /// Load `song`, charge for it and publish `Playing`
    fn start(&mut self, song: Arc<Song>) {
        info!(song = %song.id, title = %song.title, "Now playing");
        self.session.current_song = Some(song);
        self.session.play_time = Duration::ZERO;
        self.charge();
        self.state = PlaybackState::Playing;
        self.publish();
    }

    /// Unload the current song and publish `Stopped`
    fn halt(&mut self) {
        self.session.current_song = None;
        self.session.play_time = Duration::ZERO;
        self.state = PlaybackState::Stopped;
        self.publish();
    }

    /// Charge the session user the per-song price
    ///
    /// Never blocks playback: a missing user or a billing failure is logged.
    fn charge(&self) {
        let Some(user) = &self.session.user else {
            warn!("No user logged in, playing without charge");
            return;
        };

        if let Err(err) = self.billing.charge(user, self.config.song_price) {
            warn!(user = %user, error = %err, "Charge failed");
        }
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        let report = self.subscribers.notify(&snapshot);
        self.last_delivery = Some(report);
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("queue", &self.queue.len())
            .field("history", &self.history.len())
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jukebox_core::types::{AlbumId, ArtistId};
    use jukebox_core::{InMemoryAccounts, InMemoryCatalog, Playlist, User};

    struct Fixture {
        catalog: Arc<InMemoryCatalog>,
        accounts: Arc<InMemoryAccounts>,
        controller: PlaybackController,
    }

    fn create_test_song(catalog: &InMemoryCatalog, id: &str) -> Arc<Song> {
        catalog.insert_song(Song::new(
            SongId::new(id),
            format!("Song {}", id),
            AlbumId::new("album"),
            ArtistId::new("artist"),
        ))
    }

    fn fixture(songs: &[&str]) -> Fixture {
        let catalog = Arc::new(InMemoryCatalog::new());
        let mut playlist = Playlist::new(PlaylistId::new("p"), "Test");
        for id in songs {
            playlist.add_song(create_test_song(&catalog, id)).unwrap();
        }
        catalog.insert_playlist(playlist);

        let accounts = Arc::new(InMemoryAccounts::new());
        accounts.register(User::new(UserId::new("u"), "User", 10));

        let mut controller = PlaybackController::new(
            catalog.clone(),
            accounts.clone(),
            PlaybackConfig::default(),
        );
        controller.login(UserId::new("u"));

        Fixture {
            catalog,
            accounts,
            controller,
        }
    }

    fn song(catalog: &InMemoryCatalog, id: &str) -> Arc<Song> {
        catalog.find_song(&SongId::new(id)).unwrap()
    }

    fn current_id(controller: &PlaybackController) -> Option<&str> {
        controller.current_song().map(|s| s.id.as_str())
    }

    #[test]
    fn new_controller_is_stopped() {
        let f = fixture(&["a"]);
        assert_eq!(f.controller.state(), PlaybackState::Stopped);
        assert!(f.controller.current_song().is_none());
        assert!(f.controller.active_playlist().is_none());
        assert_eq!(f.controller.snapshot(), PlaybackSnapshot::stopped());
    }

    #[test]
    fn play_sets_song_and_charges() {
        let mut f = fixture(&["a", "b"]);
        let a = song(&f.catalog, "a");

        f.controller.play(a, &PlaylistId::new("p")).unwrap();

        assert_eq!(f.controller.state(), PlaybackState::Playing);
        assert_eq!(current_id(&f.controller), Some("a"));
        assert_eq!(f.controller.active_playlist(), Some(&PlaylistId::new("p")));
        assert_eq!(f.accounts.balance(&UserId::new("u")), Some(9));
    }

    #[test]
    fn play_unknown_playlist_changes_nothing() {
        let mut f = fixture(&["a"]);
        let a = song(&f.catalog, "a");

        let err = f.controller.play(a, &PlaylistId::new("nope")).unwrap_err();

        assert_eq!(err, PlaybackError::PlaylistNotFound(PlaylistId::new("nope")));
        assert_eq!(f.controller.state(), PlaybackState::Stopped);
        assert_eq!(f.accounts.balance(&UserId::new("u")), Some(10));
    }

    #[test]
    fn play_by_id_unknown_song() {
        let mut f = fixture(&["a"]);
        let err = f
            .controller
            .play_by_id(&SongId::new("zzz"), &PlaylistId::new("p"))
            .unwrap_err();
        assert_eq!(err, PlaybackError::SongNotFound(SongId::new("zzz")));
    }

    #[test]
    fn pause_resume_and_clock() {
        let mut f = fixture(&["a"]);
        let a = song(&f.catalog, "a");
        f.controller.play(a, &PlaylistId::new("p")).unwrap();

        f.controller.tick(Duration::from_secs(3));
        f.controller.pause();
        assert_eq!(f.controller.state(), PlaybackState::Paused);

        f.controller.tick(Duration::from_secs(100));
        assert_eq!(f.controller.play_time(), Duration::from_secs(3));

        f.controller.resume();
        f.controller.tick(Duration::from_secs(1));
        assert_eq!(f.controller.state(), PlaybackState::Playing);
        assert_eq!(f.controller.play_time(), Duration::from_secs(4));
        // Resume does not charge
        assert_eq!(f.accounts.balance(&UserId::new("u")), Some(9));
    }

    #[test]
    fn pause_when_stopped_is_ignored() {
        let mut f = fixture(&["a"]);
        f.controller.pause();
        assert_eq!(f.controller.state(), PlaybackState::Stopped);
        assert!(f.controller.last_delivery().is_none());
    }

    #[test]
    fn new_song_resets_play_time() {
        let mut f = fixture(&["a", "b"]);
        let a = song(&f.catalog, "a");
        f.controller.play(a, &PlaylistId::new("p")).unwrap();
        f.controller.tick(Duration::from_secs(30));

        f.controller.advance().unwrap();
        assert_eq!(f.controller.play_time(), Duration::ZERO);
    }

    #[test]
    fn stop_clears_song_but_keeps_playlist() {
        let mut f = fixture(&["a", "b"]);
        let a = song(&f.catalog, "a");
        f.controller.play(a, &PlaylistId::new("p")).unwrap();
        f.controller.tick(Duration::from_secs(5));

        f.controller.stop();

        assert_eq!(f.controller.state(), PlaybackState::Stopped);
        assert!(f.controller.current_song().is_none());
        assert_eq!(f.controller.play_time(), Duration::ZERO);
        assert_eq!(f.controller.active_playlist(), Some(&PlaylistId::new("p")));

        // Playlist restarts from its first song
        assert_eq!(f.controller.advance().unwrap().id.as_str(), "a");
    }

    #[test]
    fn advance_prefers_queue() {
        let mut f = fixture(&["a", "b", "c"]);
        let a = song(&f.catalog, "a");
        let c = song(&f.catalog, "c");
        f.controller.play(a, &PlaylistId::new("p")).unwrap();
        f.controller.enqueue(c).unwrap();

        let next = f.controller.advance().unwrap();

        assert_eq!(next.id.as_str(), "c");
        assert!(f.controller.queue().is_empty());
        assert_eq!(f.controller.history().len(), 1);
    }

    #[test]
    fn play_next_beats_enqueue() {
        let mut f = fixture(&["a", "b", "c"]);
        f.controller.enqueue(song(&f.catalog, "b")).unwrap();
        f.controller.play_next(song(&f.catalog, "c"));

        let ids: Vec<_> = f
            .controller
            .queue()
            .songs()
            .iter()
            .map(|s| s.id.to_string())
            .collect();
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[test]
    fn enqueue_duplicate_fails() {
        let mut f = fixture(&["a"]);
        f.controller.enqueue(song(&f.catalog, "a")).unwrap();
        let err = f.controller.enqueue(song(&f.catalog, "a")).unwrap_err();
        assert!(matches!(err, PlaybackError::DuplicateSong { .. }));
    }

    #[test]
    fn advance_with_nothing_stops() {
        let mut f = fixture(&[]);
        let err = f.controller.advance().unwrap_err();
        assert_eq!(err, PlaybackError::NoNextSong);
        assert_eq!(f.controller.state(), PlaybackState::Stopped);
    }

    #[test]
    fn advance_from_queue_without_active_playlist() {
        let mut f = fixture(&["a"]);
        f.controller.enqueue(song(&f.catalog, "a")).unwrap();

        let next = f.controller.advance().unwrap();

        assert_eq!(next.id.as_str(), "a");
        assert!(f.controller.active_playlist().is_none());
        assert!(f.controller.history().is_empty());
    }

    #[test]
    fn deleted_active_playlist_behaves_as_empty() {
        let mut f = fixture(&["a", "b"]);
        f.controller.play(song(&f.catalog, "a"), &PlaylistId::new("p")).unwrap();
        f.catalog.remove_playlist(&PlaylistId::new("p"));

        assert!(!f.controller.has_next());
        assert_eq!(f.controller.advance().unwrap_err(), PlaybackError::NoNextSong);
        assert!(f.controller.current_song().is_none());
    }

    #[test]
    fn reverse_with_empty_history_changes_nothing() {
        let mut f = fixture(&["a"]);
        f.controller.play(song(&f.catalog, "a"), &PlaylistId::new("p")).unwrap();

        let err = f.controller.reverse().unwrap_err();

        assert_eq!(err, PlaybackError::NoHistory);
        assert_eq!(current_id(&f.controller), Some("a"));
        assert!(f.controller.queue().is_empty());
        assert_eq!(f.controller.state(), PlaybackState::Playing);
    }

    #[test]
    fn every_play_is_charged() {
        let mut f = fixture(&["a", "b"]);
        f.controller.play(song(&f.catalog, "a"), &PlaylistId::new("p")).unwrap();
        f.controller.advance().unwrap();
        f.controller.reverse().unwrap();

        assert_eq!(f.accounts.balance(&UserId::new("u")), Some(7));
    }

    #[test]
    fn logged_out_plays_are_free() {
        let mut f = fixture(&["a"]);
        assert_eq!(f.controller.logout(), Some(UserId::new("u")));

        f.controller.play(song(&f.catalog, "a"), &PlaylistId::new("p")).unwrap();

        assert_eq!(f.controller.state(), PlaybackState::Playing);
        assert_eq!(f.accounts.balance(&UserId::new("u")), Some(10));
    }

    #[test]
    fn unknown_user_does_not_block_playback() {
        let mut f = fixture(&["a"]);
        f.controller.login(UserId::new("ghost"));

        f.controller.play(song(&f.catalog, "a"), &PlaylistId::new("p")).unwrap();
        assert_eq!(f.controller.state(), PlaybackState::Playing);
    }

    #[test]
    fn has_next_and_previous() {
        let mut f = fixture(&["a", "b"]);
        assert!(!f.controller.has_next());
        assert!(!f.controller.has_previous());

        f.controller.play(song(&f.catalog, "a"), &PlaylistId::new("p")).unwrap();
        assert!(f.controller.has_next());

        f.controller.advance().unwrap();
        assert!(f.controller.has_previous());
    }
}
