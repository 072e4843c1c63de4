//! Core error types for Riff
//!
//! The coordinator never lets these escape to a UI surface: load and
//! playback errors end up in `last_error`, sync errors end up in the log.

use crate::types::{PlaylistId, SongId};
use thiserror::Error;

/// A playable resource could not be opened
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Song has no uri (offline/demo catalog entry)
    #[error("Song {0} has no playable uri")]
    MissingUri(SongId),

    /// Uri could not be parsed or uses an unsupported scheme
    #[error("Invalid uri {uri}: {reason}")]
    InvalidUri { uri: String, reason: String },

    /// The audio engine failed to open the resource
    #[error("Failed to load audio: {0}")]
    Engine(String),
}

impl LoadError {
    /// Create an engine failure
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Create an invalid uri error
    pub fn invalid_uri(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUri {
            uri: uri.into(),
            reason: reason.into(),
        }
    }
}

/// A transport operation failed on an already loaded resource
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The engine rejected play/pause/seek/unload
    #[error("Playback error: {0}")]
    Transport(String),

    /// The resource was already released by the engine
    #[error("Resource is no longer loaded")]
    NotLoaded,
}

impl PlaybackError {
    /// Create a transport failure
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

/// A playlist durability operation failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Local storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Remote store unreachable or returned an error
    #[error("Network error: {0}")]
    Network(String),

    /// Playlist does not exist in the store
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Operation needs a signed-in owner
    #[error("No owner signed in")]
    Unauthenticated,

    /// Store rejected the input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SyncError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for SyncError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_messages() {
        let err = LoadError::MissingUri(SongId::new("7"));
        assert_eq!(err.to_string(), "Song 7 has no playable uri");

        let err = LoadError::invalid_uri("ftp://x", "unsupported scheme");
        assert_eq!(err.to_string(), "Invalid uri ftp://x: unsupported scheme");
    }

    #[test]
    fn sync_error_messages() {
        let err = SyncError::PlaylistNotFound(PlaylistId::new("p9"));
        assert_eq!(err.to_string(), "Playlist not found: p9");
        assert_eq!(SyncError::network("timeout").to_string(), "Network error: timeout");
    }
}
