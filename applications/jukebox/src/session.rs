//! Line-oriented jukebox session
//!
//! Reads one [`Command`] per line, runs it against a [`PlaybackController`]
//! and reports the outcome. Playback changes themselves are printed by the
//! [`ConsoleDisplay`] subscriber, not by the command handlers.

use crate::config::JukeboxConfig;
use crate::error::Result;
use crate::library::{build_catalog, demo_library};
use jukebox_core::types::{ArtistId, PlaylistId, SongId, UserId};
use jukebox_core::{Catalog, CoreError, Credits, InMemoryAccounts, InMemoryCatalog, Playlist, User};
use jukebox_playback::{
    PlaybackController, PlaybackError, PlaybackSnapshot, PlaybackState, PlaybackSubscriber,
    SubscriberError, SubscriberId,
};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const HELP: &str = "\
commands:
  play <song> <playlist>  play a song with the playlist as source
  next                    skip to the next song
  prev                    go back to the previous song
  pause | resume | stop   control the current song
  queue <song>            add a song to the end of the queue
  playnext <song>         put a song at the head of the queue
  tick <secs>             let playback run for some seconds
  status                  show what is playing
  playlists [text]        list playlists whose name contains text
  newplaylist <name>      create an empty playlist
  add <playlist> <song>   append a song to a playlist
  rename <playlist> <name>
                          give a playlist a new name
  delete <playlist>       remove a playlist
  artist <artist>         list songs by an artist
  balance                 show remaining credit
  topup <credits>         add credit to the account
  quit                    leave the jukebox";

/// Scripted walkthrough used by `jukebox demo`
pub const DEMO_SCRIPT: &str = "\
# start the evening playlist
play tide evening
tick 42
next
queue acacia
playnext dusk
next
next
prev
pause
tick 10
resume
status
stop
next
balance
quit";

// ===== Commands =====

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play { song: SongId, playlist: PlaylistId },
    Next,
    Prev,
    Pause,
    Resume,
    Stop,
    Queue(SongId),
    PlayNext(SongId),
    Tick(Duration),
    Status,
    Playlists(String),
    NewPlaylist(String),
    AddToPlaylist { playlist: PlaylistId, song: SongId },
    RenamePlaylist { playlist: PlaylistId, name: String },
    DeletePlaylist(PlaylistId),
    Artist(ArtistId),
    Balance,
    TopUp(Credits),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("usage: {command} {expected}")]
    Usage {
        command: &'static str,
        expected: &'static str,
    },

    #[error("'{0}' takes no arguments")]
    UnexpectedArguments(String),

    #[error("invalid number of seconds '{0}'")]
    InvalidSeconds(String),

    #[error("invalid credit amount '{0}'")]
    InvalidAmount(String),
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(ParseError::Empty)?.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let usage = |command, expected| ParseError::Usage { command, expected };

        match (name.as_str(), args.as_slice()) {
            ("play", [song, playlist]) => Ok(Self::Play {
                song: SongId::new(*song),
                playlist: PlaylistId::new(*playlist),
            }),
            ("play", _) => Err(usage("play", "<song> <playlist>")),
            ("queue", [song]) => Ok(Self::Queue(SongId::new(*song))),
            ("queue", _) => Err(usage("queue", "<song>")),
            ("playnext", [song]) => Ok(Self::PlayNext(SongId::new(*song))),
            ("playnext", _) => Err(usage("playnext", "<song>")),
            ("tick", [secs]) => secs
                .parse::<u64>()
                .map(|secs| Self::Tick(Duration::from_secs(secs)))
                .map_err(|_| ParseError::InvalidSeconds((*secs).to_string())),
            ("tick", _) => Err(usage("tick", "<secs>")),
            ("playlists", query) => Ok(Self::Playlists(query.join(" "))),
            ("newplaylist", []) => Err(usage("newplaylist", "<name>")),
            ("newplaylist", name) => Ok(Self::NewPlaylist(name.join(" "))),
            ("add", [playlist, song]) => Ok(Self::AddToPlaylist {
                playlist: PlaylistId::new(*playlist),
                song: SongId::new(*song),
            }),
            ("add", _) => Err(usage("add", "<playlist> <song>")),
            ("rename", [playlist, name @ ..]) if !name.is_empty() => Ok(Self::RenamePlaylist {
                playlist: PlaylistId::new(*playlist),
                name: name.join(" "),
            }),
            ("rename", _) => Err(usage("rename", "<playlist> <name>")),
            ("delete", [playlist]) => Ok(Self::DeletePlaylist(PlaylistId::new(*playlist))),
            ("delete", _) => Err(usage("delete", "<playlist>")),
            ("artist", [artist]) => Ok(Self::Artist(ArtistId::new(*artist))),
            ("artist", _) => Err(usage("artist", "<artist>")),
            ("topup", [amount]) => amount
                .parse::<u32>()
                .map(|amount| Self::TopUp(Credits::from(amount)))
                .map_err(|_| ParseError::InvalidAmount((*amount).to_string())),
            ("topup", _) => Err(usage("topup", "<credits>")),
            (name, args) => {
                let command = match name {
                    "next" => Self::Next,
                    "prev" => Self::Prev,
                    "pause" => Self::Pause,
                    "resume" => Self::Resume,
                    "stop" => Self::Stop,
                    "status" => Self::Status,
                    "balance" => Self::Balance,
                    "help" => Self::Help,
                    "quit" | "exit" => Self::Quit,
                    _ => return Err(ParseError::Unknown(name.to_string())),
                };
                if args.is_empty() {
                    Ok(command)
                } else {
                    Err(ParseError::UnexpectedArguments(name.to_string()))
                }
            }
        }
    }
}

// ===== Display =====

/// Subscriber that prints one line per playback change
pub struct ConsoleDisplay {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleDisplay {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl PlaybackSubscriber for ConsoleDisplay {
    fn update(&self, snapshot: &PlaybackSnapshot) -> std::result::Result<(), SubscriberError> {
        let line = describe(snapshot);
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{}", line)
            .and_then(|()| out.flush())
            .map_err(|e| SubscriberError::new(e.to_string()))
    }
}

/// Render a snapshot as a single status line
pub fn describe(snapshot: &PlaybackSnapshot) -> String {
    let Some(song) = &snapshot.current_song else {
        return format!("[{}]", snapshot.state);
    };

    let elapsed = format_time(snapshot.play_time.unwrap_or_default());
    match song.duration {
        Some(total) => format!(
            "[{}] {} {}/{}",
            snapshot.state,
            song.title,
            elapsed,
            format_time(total)
        ),
        None => format!("[{}] {} {}", snapshot.state, song.title, elapsed),
    }
}

/// Format a duration as `m:ss`
pub fn format_time(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

// ===== Session =====

/// A logged-in jukebox session over an in-memory library
pub struct Session {
    catalog: Arc<InMemoryCatalog>,
    accounts: Arc<InMemoryAccounts>,
    controller: PlaybackController,
    user: UserId,
    displays: Vec<Arc<dyn PlaybackSubscriber>>,
    echo: bool,
}

impl Session {
    /// Build the catalog and accounts from `config` and log the user in
    pub fn new(config: &JukeboxConfig) -> Result<Self> {
        config.validate()?;

        let library = if config.library.is_empty() {
            info!("No library configured, loading demo library");
            demo_library()
        } else {
            config.library.clone()
        };
        let catalog = Arc::new(build_catalog(&library)?);

        let user = UserId::new(config.user.id.as_str());
        let accounts = Arc::new(InMemoryAccounts::new());
        accounts.register(User::new(
            user.clone(),
            config.user.name.as_str(),
            config.user.credit,
        ));

        let mut controller = PlaybackController::new(
            catalog.clone(),
            accounts.clone(),
            config.playback.clone(),
        );
        controller.login(user.clone());

        Ok(Self {
            catalog,
            accounts,
            controller,
            user,
            displays: Vec::new(),
            echo: false,
        })
    }

    /// Subscribe a display for the lifetime of the session
    pub fn attach(&mut self, display: Arc<dyn PlaybackSubscriber>) -> SubscriberId {
        let id = self.controller.subscribe_dyn(&display);
        self.displays.push(display);
        id
    }

    /// Repeat each command before its output
    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn catalog(&self) -> &InMemoryCatalog {
        &self.catalog
    }

    pub fn balance(&self) -> Option<Credits> {
        self.accounts.balance(&self.user)
    }

    /// Run one command, returning the text to show the user
    ///
    /// Playback changes are reported through the attached displays, so the
    /// reply is empty for most transport commands.
    pub fn execute(&mut self, command: &Command) -> Result<String> {
        let reply = match command {
            Command::Play { song, playlist } => {
                self.controller.play_by_id(song, playlist)?;
                String::new()
            }
            Command::Next => {
                self.controller.advance()?;
                String::new()
            }
            Command::Prev => {
                self.controller.reverse()?;
                String::new()
            }
            Command::Pause => self.transport(PlaybackState::Playing, PlaybackController::pause),
            Command::Resume => self.transport(PlaybackState::Paused, PlaybackController::resume),
            Command::Stop => {
                if self.controller.state() == PlaybackState::Stopped {
                    "already stopped".to_string()
                } else {
                    self.controller.stop();
                    String::new()
                }
            }
            Command::Queue(song_id) => {
                self.controller.enqueue_by_id(song_id)?;
                format!("queued {} ({} waiting)", song_id, self.controller.queue().len())
            }
            Command::PlayNext(song_id) => {
                let song = self
                    .catalog
                    .find_song(song_id)
                    .ok_or_else(|| PlaybackError::SongNotFound(song_id.clone()))?;
                self.controller.play_next(song);
                format!("{} plays next", song_id)
            }
            Command::Tick(elapsed) => {
                self.controller.tick(*elapsed);
                format!("play time {}", format_time(self.controller.play_time()))
            }
            Command::Status => self.status(),
            Command::Playlists(query) => {
                let found = self.catalog.search_playlists(query);
                if found.is_empty() {
                    "no matching playlists".to_string()
                } else {
                    found
                        .iter()
                        .map(|p| format!("{}: {} ({} songs)", p.id(), p.name(), p.len()))
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            Command::NewPlaylist(name) => {
                let id = PlaylistId::generate();
                self.catalog.insert_playlist(Playlist::new(id.clone(), name.as_str()));
                info!(playlist = %id, name = name.as_str(), "Playlist created");
                format!("created playlist {} ({})", name, id)
            }
            Command::AddToPlaylist { playlist, song } => {
                let song = self
                    .catalog
                    .find_song(song)
                    .ok_or_else(|| CoreError::SongNotFound(song.clone()))?;
                let title = song.title.clone();
                let len = self
                    .catalog
                    .update_playlist(playlist, |p| p.add_song(song).map(|()| p.len()))??;
                format!("added {} to {} ({} songs)", title, playlist, len)
            }
            Command::RenamePlaylist { playlist, name } => {
                self.catalog.update_playlist(playlist, |p| p.rename(name.as_str()))?;
                format!("renamed {} to {}", playlist, name)
            }
            Command::DeletePlaylist(id) => {
                let removed = self
                    .catalog
                    .remove_playlist(id)
                    .ok_or_else(|| CoreError::PlaylistNotFound(id.clone()))?;
                info!(playlist = %id, "Playlist deleted");
                format!("deleted playlist {}", removed.name())
            }
            Command::Artist(artist) => {
                let songs = self.catalog.songs_by_artist(artist);
                if songs.is_empty() {
                    format!("no songs by {}", artist)
                } else {
                    songs
                        .iter()
                        .map(|song| format!("{}: {}", song.id, song.title))
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            Command::Balance => match self.balance() {
                Some(credit) => format!("{}: {} credits", self.user, credit),
                None => format!("{}: no account", self.user),
            },
            Command::TopUp(amount) => {
                let credit = self.accounts.top_up(&self.user, *amount)?;
                format!("{}: {} credits", self.user, credit)
            }
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        };
        Ok(reply)
    }

    /// Read commands from `input` until it ends or `quit` is entered
    ///
    /// Parse and playback errors are reported to `output` and the session
    /// carries on.
    pub fn run(&mut self, input: impl BufRead, output: &mut impl Write) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if self.echo {
                writeln!(output, "> {}", line)?;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(err) => {
                    writeln!(output, "error: {}", err)?;
                    continue;
                }
            };

            if command == Command::Quit {
                break;
            }

            match self.execute(&command) {
                Ok(reply) if reply.is_empty() => {}
                Ok(reply) => writeln!(output, "{}", reply)?,
                Err(err) => {
                    warn!(command = line, error = %err, "Command failed");
                    writeln!(output, "error: {}", err)?;
                }
            }
            output.flush()?;
        }
        Ok(())
    }

    fn transport(&mut self, required: PlaybackState, op: fn(&mut PlaybackController)) -> String {
        if self.controller.state() == required {
            op(&mut self.controller);
            String::new()
        } else {
            format!("cannot do that while {}", self.controller.state())
        }
    }

    fn status(&self) -> String {
        let controller = &self.controller;
        let song = controller.current_song().map_or_else(
            || "-".to_string(),
            |song| format!("{} ({})", song.title, format_time(controller.play_time())),
        );
        let playlist = controller
            .active_playlist()
            .map_or_else(|| "-".to_string(), ToString::to_string);

        format!(
            "state: {}\nsong: {}\nplaylist: {}\nqueue: {} waiting\nhistory: {} played",
            controller.state(),
            song,
            playlist,
            controller.queue().len(),
            controller.history().len()
        )
    }
}
