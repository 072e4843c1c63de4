//! CLI error types

use riff_playback::PlayerError;
use riff_remote::RemoteStoreError;
use riff_storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteStoreError),

    #[error("Player error: {0}")]
    Player(#[from] PlayerError),
}
