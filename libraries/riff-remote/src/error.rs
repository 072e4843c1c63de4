//! Error types for the remote playlist table

use riff_core::{PlaylistId, SyncError};
use thiserror::Error;

/// Errors that can occur when talking to the remote playlist table.
#[derive(Error, Debug)]
pub enum RemoteStoreError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Credentials missing, expired or rejected
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid table URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// No row matched the playlist id
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Rejected before any request was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for remote store operations.
pub type Result<T> = std::result::Result<T, RemoteStoreError>;

impl From<RemoteStoreError> for SyncError {
    fn from(err: RemoteStoreError) -> Self {
        match err {
            RemoteStoreError::AuthRequired => SyncError::Unauthenticated,
            RemoteStoreError::PlaylistNotFound(id) => SyncError::PlaylistNotFound(id),
            RemoteStoreError::InvalidInput(msg) => SyncError::InvalidInput(msg),
            RemoteStoreError::ServerError { status, message } if status == 400 || status == 422 => {
                SyncError::InvalidInput(message)
            }
            other => SyncError::network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_and_not_found_keep_their_meaning() {
        assert_eq!(
            SyncError::from(RemoteStoreError::AuthRequired),
            SyncError::Unauthenticated
        );
        assert_eq!(
            SyncError::from(RemoteStoreError::PlaylistNotFound(PlaylistId::new("7"))),
            SyncError::PlaylistNotFound(PlaylistId::new("7"))
        );
    }

    #[test]
    fn rejected_payload_is_invalid_input() {
        let err = RemoteStoreError::ServerError {
            status: 400,
            message: "null value in column \"name\"".into(),
        };
        assert!(matches!(SyncError::from(err), SyncError::InvalidInput(_)));
    }

    #[test]
    fn everything_else_is_network() {
        let err = RemoteStoreError::ServerError {
            status: 503,
            message: "maintenance".into(),
        };
        assert_eq!(
            SyncError::from(err),
            SyncError::network("Server error (503): maintenance")
        );
        assert!(matches!(
            SyncError::from(RemoteStoreError::ServerUnreachable("refused".into())),
            SyncError::Network(_)
        ));
    }
}
