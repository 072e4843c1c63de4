//! Connection settings and wire rows for the remote playlist table.

use riff_core::{Playlist, PlaylistId, SongId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for connecting to the remote playlist table.
#[derive(Clone)]
pub struct RemoteConfig {
    /// Base URL of the project (e.g., "https://abc.example.co")
    pub url: String,
    /// Project key sent as `apikey` on every request
    pub api_key: String,
    /// Signed-in user's token; the project key is used as bearer without one
    pub access_token: Option<String>,
}

impl RemoteConfig {
    /// Create a config for anonymous access.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            access_token: None,
        }
    }

    /// Attach a signed-in user's access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub(crate) fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.api_key)
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// One row of the `playlists` table as returned by the server
#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistRow {
    pub id: PlaylistId,
    pub name: String,
    /// Null for rows created without membership
    #[serde(default)]
    pub song_ids: Option<Vec<SongId>>,
}

impl From<PlaylistRow> for Playlist {
    fn from(row: PlaylistRow) -> Self {
        Playlist::with_songs(row.id, row.name, row.song_ids.unwrap_or_default())
    }
}

/// Body for creating a playlist
#[derive(Debug, Serialize)]
pub(crate) struct NewPlaylistRow<'a> {
    pub name: &'a str,
    pub user_id: &'a str,
    pub song_ids: Vec<&'a str>,
}

/// Body for replacing a playlist's membership
#[derive(Debug, Serialize)]
pub(crate) struct MembershipPatch<'a> {
    pub song_ids: Vec<&'a str>,
}
