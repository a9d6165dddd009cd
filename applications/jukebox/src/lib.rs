//! Jukebox Application Library
//!
//! Command-line front end for the jukebox playback controller: configuration
//! loading, library setup and the interactive command session.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod error;
pub mod library;
pub mod session;

// Re-export commonly used types for convenience
pub use config::JukeboxConfig;
pub use error::{AppError, Result};
pub use session::{Command, ConsoleDisplay, ParseError, Session};
