//! Playlist store backed by a remote REST table.

use crate::error::{RemoteStoreError, Result};
use crate::types::{MembershipPatch, NewPlaylistRow, PlaylistRow, RemoteConfig};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use riff_core::{Playlist, PlaylistId, PlaylistStore, SongId, SyncError, UserId};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const TABLE_PATH: &str = "rest/v1/playlists";

/// Playlist store that keeps playlists in a PostgREST-style `playlists` table.
///
/// Rows are scoped by `user_id`; listing returns them in creation order.
/// Timeouts are owned here, the coordinator never cancels a store call.
///
/// # Example
///
/// ```ignore
/// use riff_remote::{RemoteConfig, RemotePlaylistStore};
///
/// let config = RemoteConfig::new("https://abc.example.co", "anon-key")
///     .with_access_token(token);
/// let store = RemotePlaylistStore::new(config)?;
/// let mine = store.list(Some(&owner)).await?;
/// ```
pub struct RemotePlaylistStore {
    http: Client,
    config: RemoteConfig,
    endpoint: String,
}

impl RemotePlaylistStore {
    /// Create a new store with the given configuration.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(RemoteStoreError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(RemoteStoreError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        Url::parse(&url).map_err(|e| RemoteStoreError::InvalidUrl(e.to_string()))?;

        if config.api_key.trim().is_empty() {
            return Err(RemoteStoreError::AuthRequired);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Riff/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let endpoint = format!("{url}/{TABLE_PATH}");
        Ok(Self {
            http,
            config: RemoteConfig { url, ..config },
            endpoint,
        })
    }

    /// Normalized base URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Whether requests carry a signed-in user's token.
    pub fn is_authenticated(&self) -> bool {
        self.config.access_token.is_some()
    }

    /// Fetch `owner`'s playlists, oldest first.
    pub async fn fetch(&self, owner: &UserId) -> Result<Vec<Playlist>> {
        debug!(url = %self.endpoint, owner = %owner, "Fetching playlists");

        let request = self.http.get(&self.endpoint).query(&[
            ("select", "id,name,song_ids".to_string()),
            ("user_id", format!("eq.{owner}")),
            ("order", "created_at.asc".to_string()),
        ]);
        let rows = self.rows(request, "playlists").await?;

        debug!(count = rows.len(), "Fetched playlists");
        Ok(rows.into_iter().map(Playlist::from).collect())
    }

    /// Insert an empty playlist owned by `owner`.
    pub async fn insert(&self, owner: &UserId, name: &str) -> Result<Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RemoteStoreError::InvalidInput(
                "playlist name is empty".into(),
            ));
        }

        let body = NewPlaylistRow {
            name,
            user_id: owner.as_str(),
            song_ids: Vec::new(),
        };
        let request = self
            .http
            .post(&self.endpoint)
            .header("Prefer", "return=representation")
            .json(&body);

        let row = self
            .rows(request, "created playlist")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RemoteStoreError::ParseError("server returned no row".into()))?;

        let playlist = Playlist::from(row);
        info!(playlist_id = %playlist.id, owner = %owner, "Created remote playlist");
        Ok(playlist)
    }

    /// Overwrite the membership list of one playlist.
    pub async fn patch_membership(
        &self,
        playlist_id: &PlaylistId,
        song_ids: &[SongId],
    ) -> Result<()> {
        let mut seen = HashSet::with_capacity(song_ids.len());
        let song_ids = song_ids
            .iter()
            .filter(|id| seen.insert(*id))
            .map(SongId::as_str)
            .collect();

        let request = self
            .http
            .patch(&self.endpoint)
            .query(&[("id", format!("eq.{playlist_id}"))])
            .header("Prefer", "return=representation")
            .json(&MembershipPatch { song_ids });

        self.expect_row(request, playlist_id).await?;
        debug!(playlist_id = %playlist_id, "Replaced remote membership");
        Ok(())
    }

    /// Delete one playlist row.
    pub async fn remove(&self, playlist_id: &PlaylistId) -> Result<()> {
        let request = self
            .http
            .delete(&self.endpoint)
            .query(&[("id", format!("eq.{playlist_id}"))])
            .header("Prefer", "return=representation");

        self.expect_row(request, playlist_id).await?;
        info!(playlist_id = %playlist_id, "Deleted remote playlist");
        Ok(())
    }

    /// Send with credentials and map transport failures.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .header("apikey", &self.config.api_key)
            .bearer_auth(self.config.bearer())
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    RemoteStoreError::ServerUnreachable(e.to_string())
                } else {
                    RemoteStoreError::Request(e)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(RemoteStoreError::AuthRequired)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(RemoteStoreError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }

    async fn rows(&self, request: RequestBuilder, what: &str) -> Result<Vec<PlaylistRow>> {
        let response = self.send(request).await?;
        response
            .json()
            .await
            .map_err(|e| RemoteStoreError::ParseError(format!("Failed to parse {what}: {e}")))
    }

    /// A write that matched no row means the playlist is gone.
    async fn expect_row(&self, request: RequestBuilder, playlist_id: &PlaylistId) -> Result<()> {
        let rows = self.rows(request, "affected rows").await?;
        if rows.is_empty() {
            return Err(RemoteStoreError::PlaylistNotFound(playlist_id.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl PlaylistStore for RemotePlaylistStore {
    async fn list(&self, owner: Option<&UserId>) -> std::result::Result<Vec<Playlist>, SyncError> {
        match owner {
            Some(owner) => Ok(self.fetch(owner).await?),
            None => Ok(Vec::new()),
        }
    }

    async fn create(
        &self,
        owner: Option<&UserId>,
        name: &str,
    ) -> std::result::Result<Playlist, SyncError> {
        let owner = owner.ok_or(SyncError::Unauthenticated)?;
        Ok(self.insert(owner, name).await?)
    }

    async fn update_membership(
        &self,
        playlist_id: &PlaylistId,
        song_ids: &[SongId],
    ) -> std::result::Result<(), SyncError> {
        Ok(self.patch_membership(playlist_id, song_ids).await?)
    }

    async fn delete(&self, playlist_id: &PlaylistId) -> std::result::Result<(), SyncError> {
        Ok(self.remove(playlist_id).await?)
    }
}
