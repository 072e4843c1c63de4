//! Storage-specific errors

use riff_core::{PlaylistId, SyncError};
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Playlist does not exist
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Operation needs a signed-in owner
    #[error("No owner to store playlists for")]
    NoOwner,

    /// Rejected input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for SyncError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::PlaylistNotFound(id) => SyncError::PlaylistNotFound(id),
            StorageError::NoOwner => SyncError::Unauthenticated,
            StorageError::InvalidInput(msg) => SyncError::invalid_input(msg),
            other => SyncError::storage(other.to_string()),
        }
    }
}
