//! Error types for the player driver

use thiserror::Error;

/// Errors returned by a [`PlayerHandle`](crate::PlayerHandle)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// The player task has shut down
    #[error("Player has stopped")]
    Stopped,

    /// The player dropped a reply without answering
    #[error("Player did not reply to {0}")]
    NoReply(&'static str),
}

/// Result type for player handle operations
pub type Result<T> = std::result::Result<T, PlayerError>;
