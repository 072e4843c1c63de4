//! SQLite playlist store

use crate::error::{Result, StorageError};
use crate::{create_pool, run_migrations};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use riff_core::{Playlist, PlaylistId, PlaylistStore, SongId, SyncError, UserId};
use sqlx::{Row, SqlitePool};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Playlist store backed by a `SQLite` pool
#[derive(Debug, Clone)]
pub struct SqlitePlaylistStore {
    pool: SqlitePool,
}

impl SqlitePlaylistStore {
    /// Wrap a pool that already has migrations applied
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and bring the schema up to date
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated
    pub async fn open(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn list_for(&self, owner: &UserId) -> Result<Vec<Playlist>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name
            FROM playlists
            WHERE owner_id = ?
            ORDER BY created_at, rowid
            "#,
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut playlists = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("id")?;
            let name: String = row.try_get("name")?;
            playlists.push(Playlist::new(PlaylistId::new(id), name));
        }

        let index: HashMap<String, usize> = playlists
            .iter()
            .enumerate()
            .map(|(i, playlist)| (playlist.id.as_str().to_string(), i))
            .collect();

        let memberships = sqlx::query(
            r#"
            SELECT ps.playlist_id, ps.song_id
            FROM playlist_songs ps
            JOIN playlists p ON p.id = ps.playlist_id
            WHERE p.owner_id = ?
            ORDER BY ps.playlist_id, ps.position
            "#,
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await?;

        for row in memberships {
            let playlist_id: String = row.try_get("playlist_id")?;
            let song_id: String = row.try_get("song_id")?;
            if let Some(&i) = index.get(&playlist_id) {
                playlists[i].song_ids.push(SongId::new(song_id));
            }
        }

        Ok(playlists)
    }

    async fn insert(&self, owner: &UserId, name: &str) -> Result<Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::InvalidInput("playlist name is empty".into()));
        }

        let id = PlaylistId::generate();
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        sqlx::query(
            r#"
            INSERT INTO playlists (id, owner_id, name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.as_str())
        .bind(owner.as_str())
        .bind(name)
        .bind(now.as_str())
        .bind(now.as_str())
        .execute(&self.pool)
        .await?;

        debug!(playlist_id = %id, owner = %owner, "Inserted playlist");
        Ok(Playlist::new(id, name))
    }

    async fn replace_membership(&self, playlist_id: &PlaylistId, song_ids: &[SongId]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
            .bind(playlist_id.as_str())
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(StorageError::PlaylistNotFound(playlist_id.clone()));
        }

        sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ?")
            .bind(playlist_id.as_str())
            .execute(&mut *tx)
            .await?;

        let mut seen = HashSet::with_capacity(song_ids.len());
        let mut position: i64 = 0;
        for song_id in song_ids {
            if !seen.insert(song_id) {
                continue;
            }
            sqlx::query(
                "INSERT INTO playlist_songs (playlist_id, song_id, position) VALUES (?, ?, ?)",
            )
            .bind(playlist_id.as_str())
            .bind(song_id.as_str())
            .bind(position)
            .execute(&mut *tx)
            .await?;
            position += 1;
        }

        tx.commit().await?;
        debug!(playlist_id = %playlist_id, songs = position, "Replaced playlist membership");
        Ok(())
    }

    async fn remove(&self, playlist_id: &PlaylistId) -> Result<()> {
        // Membership rows go with it (ON DELETE CASCADE)
        let deleted = sqlx::query("DELETE FROM playlists WHERE id = ?")
            .bind(playlist_id.as_str())
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(StorageError::PlaylistNotFound(playlist_id.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl PlaylistStore for SqlitePlaylistStore {
    async fn list(&self, owner: Option<&UserId>) -> std::result::Result<Vec<Playlist>, SyncError> {
        match owner {
            Some(owner) => Ok(self.list_for(owner).await?),
            None => Ok(Vec::new()),
        }
    }

    async fn create(
        &self,
        owner: Option<&UserId>,
        name: &str,
    ) -> std::result::Result<Playlist, SyncError> {
        let owner = owner.ok_or(StorageError::NoOwner)?;
        Ok(self.insert(owner, name).await?)
    }

    async fn update_membership(
        &self,
        playlist_id: &PlaylistId,
        song_ids: &[SongId],
    ) -> std::result::Result<(), SyncError> {
        Ok(self.replace_membership(playlist_id, song_ids).await?)
    }

    async fn delete(&self, playlist_id: &PlaylistId) -> std::result::Result<(), SyncError> {
        Ok(self.remove(playlist_id).await?)
    }
}
