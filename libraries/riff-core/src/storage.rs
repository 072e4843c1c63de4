//! Playlist store contract
//!
//! The player owns the in-memory playlist collection; a `PlaylistStore` owns
//! the durable copies. Implementations may be local (SQLite, memory) or
//! remote (HTTP table) and are expected to be slow or fail at times.

use crate::error::SyncError;
use crate::types::{Playlist, PlaylistId, SongId, UserId};
use async_trait::async_trait;

/// Durable playlist collection
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// List the owner's playlists in display order
    ///
    /// With no owner (signed out / offline) implementations return an empty
    /// list instead of failing.
    async fn list(&self, owner: Option<&UserId>) -> Result<Vec<Playlist>, SyncError>;

    /// Create an empty playlist and return the stored record
    ///
    /// The returned id is assigned by the store. Without an owner there is
    /// nowhere to put it, so implementations fail with
    /// [`SyncError::Unauthenticated`].
    async fn create(&self, owner: Option<&UserId>, name: &str) -> Result<Playlist, SyncError>;

    /// Replace the playlist's song membership
    async fn update_membership(
        &self,
        playlist_id: &PlaylistId,
        song_ids: &[SongId],
    ) -> Result<(), SyncError>;

    /// Delete a playlist
    async fn delete(&self, playlist_id: &PlaylistId) -> Result<(), SyncError>;
}
