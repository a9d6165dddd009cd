/// Jukebox configuration
use crate::error::{AppError, Result};
use jukebox_core::Credits;
use jukebox_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "jukebox.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JukeboxConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_user")]
    pub user: UserSettings,

    #[serde(default)]
    pub library: LibrarySettings,
}

/// The user logged in when the session starts
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserSettings {
    #[serde(default = "default_user_id")]
    pub id: String,

    #[serde(default = "default_user_name")]
    pub name: String,

    #[serde(default = "default_credit")]
    pub credit: Credits,
}

/// Songs and playlists loaded into the catalog at startup
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LibrarySettings {
    #[serde(default)]
    pub artists: Vec<ArtistEntry>,

    #[serde(default)]
    pub albums: Vec<AlbumEntry>,

    #[serde(default)]
    pub songs: Vec<SongEntry>,

    #[serde(default)]
    pub playlists: Vec<PlaylistEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlbumEntry {
    pub id: String,
    pub name: String,
    pub artist: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SongEntry {
    pub id: String,
    pub title: String,
    pub album: String,
    pub artist: String,

    /// Track length in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistEntry {
    pub id: String,
    pub name: String,

    /// Song ids in play order
    #[serde(default)]
    pub songs: Vec<String>,

    #[serde(default)]
    pub shuffle: bool,
}

impl LibrarySettings {
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty() && self.playlists.is_empty()
    }
}

impl JukeboxConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `jukebox.toml` in the
    /// working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. JUKEBOX_PLAYBACK__SONG_PRICE=2
        settings = settings.add_source(
            config::Environment::with_prefix("JUKEBOX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Parse configuration from a TOML document, without environment overrides
    pub fn from_toml(source: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.song_price < 0 {
            return Err(AppError::Config(format!(
                "song price cannot be negative (got {})",
                self.playback.song_price
            )));
        }

        if self.user.id.trim().is_empty() {
            return Err(AppError::Config("user id is required".to_string()));
        }

        let mut song_ids = HashSet::new();
        for song in &self.library.songs {
            if !song_ids.insert(song.id.as_str()) {
                return Err(AppError::Config(format!("duplicate song id '{}'", song.id)));
            }
        }

        let mut playlist_ids = HashSet::new();
        for playlist in &self.library.playlists {
            if !playlist_ids.insert(playlist.id.as_str()) {
                return Err(AppError::Config(format!(
                    "duplicate playlist id '{}'",
                    playlist.id
                )));
            }

            if let Some(missing) = playlist
                .songs
                .iter()
                .find(|id| !song_ids.contains(id.as_str()))
            {
                return Err(AppError::Config(format!(
                    "playlist '{}' references unknown song '{}'",
                    playlist.id, missing
                )));
            }
        }

        Ok(())
    }
}

// Default values
fn default_user() -> UserSettings {
    UserSettings {
        id: default_user_id(),
        name: default_user_name(),
        credit: default_credit(),
    }
}

fn default_user_id() -> String {
    "guest".to_string()
}

fn default_user_name() -> String {
    "Guest".to_string()
}

fn default_credit() -> Credits {
    10
}

impl Default for JukeboxConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            user: default_user(),
            library: LibrarySettings::default(),
        }
    }
}
