/// ID types for jukebox entities
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from an existing value
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new random ID
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Get the inner string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Song identifier
    SongId
);
string_id!(
    /// Album identifier
    AlbumId
);
string_id!(
    /// Artist identifier
    ArtistId
);
string_id!(
    /// Playlist identifier
    PlaylistId
);
string_id!(
    /// User identifier
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(SongId::generate(), SongId::generate());
    }

    #[test]
    fn display_matches_inner_value() {
        let id = PlaylistId::new("evening");
        assert_eq!(id.to_string(), "evening");
        assert_eq!(id.as_str(), "evening");
    }

    #[test]
    fn serializes_transparently() {
        let id = UserId::from("alice");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"alice\"");
    }
}
