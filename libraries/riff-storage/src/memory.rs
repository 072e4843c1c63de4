//! In-memory playlist store

use async_trait::async_trait;
use riff_core::{Playlist, PlaylistId, PlaylistStore, SongId, SyncError, UserId};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Record {
    owner: UserId,
    playlist: Playlist,
}

/// Playlist store that lives only as long as the process
///
/// Keeps the same owner scoping and error behavior as the durable stores.
#[derive(Debug, Default)]
pub struct MemoryPlaylistStore {
    records: RwLock<Vec<Record>>,
}

impl MemoryPlaylistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `playlists` belonging to `owner`
    pub fn with_playlists(owner: &UserId, playlists: impl IntoIterator<Item = Playlist>) -> Self {
        let records = playlists
            .into_iter()
            .map(|playlist| Record {
                owner: owner.clone(),
                playlist,
            })
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Stored copy of a playlist, whoever owns it
    pub async fn get(&self, playlist_id: &PlaylistId) -> Option<Playlist> {
        self.records
            .read()
            .await
            .iter()
            .find(|record| &record.playlist.id == playlist_id)
            .map(|record| record.playlist.clone())
    }

    /// Number of stored playlists across all owners
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl PlaylistStore for MemoryPlaylistStore {
    async fn list(&self, owner: Option<&UserId>) -> Result<Vec<Playlist>, SyncError> {
        let Some(owner) = owner else {
            return Ok(Vec::new());
        };

        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|record| &record.owner == owner)
            .map(|record| record.playlist.clone())
            .collect())
    }

    async fn create(&self, owner: Option<&UserId>, name: &str) -> Result<Playlist, SyncError> {
        let owner = owner.ok_or(SyncError::Unauthenticated)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(SyncError::invalid_input("playlist name is empty"));
        }

        let playlist = Playlist::new(PlaylistId::generate(), name);
        self.records.write().await.push(Record {
            owner: owner.clone(),
            playlist: playlist.clone(),
        });
        Ok(playlist)
    }

    async fn update_membership(
        &self,
        playlist_id: &PlaylistId,
        song_ids: &[SongId],
    ) -> Result<(), SyncError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| &record.playlist.id == playlist_id)
            .ok_or_else(|| SyncError::PlaylistNotFound(playlist_id.clone()))?;

        record.playlist.song_ids.clear();
        for song_id in song_ids {
            record.playlist.insert_song(song_id.clone());
        }
        Ok(())
    }

    async fn delete(&self, playlist_id: &PlaylistId) -> Result<(), SyncError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| &record.playlist.id != playlist_id);

        if records.len() == before {
            return Err(SyncError::PlaylistNotFound(playlist_id.clone()));
        }
        Ok(())
    }
}
