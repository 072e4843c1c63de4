//! Playlist types

use super::ids::{PlaylistId, SongId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted playlist name, in characters
pub const MAX_PLAYLIST_NAME_LEN: usize = 50;

/// User playlist
///
/// `song_ids` keeps playback order and never holds the same id twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,

    #[serde(default)]
    pub song_ids: Vec<SongId>,
}

impl Playlist {
    /// Create an empty playlist
    pub fn new(id: PlaylistId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            song_ids: Vec::new(),
        }
    }

    /// Create a playlist with songs, dropping repeated ids
    pub fn with_songs(
        id: PlaylistId,
        name: impl Into<String>,
        song_ids: impl IntoIterator<Item = SongId>,
    ) -> Self {
        let mut playlist = Self::new(id, name);
        for song_id in song_ids {
            playlist.insert_song(song_id);
        }
        playlist
    }

    /// Check membership
    pub fn contains(&self, song_id: &SongId) -> bool {
        self.song_ids.contains(song_id)
    }

    /// Number of songs
    pub fn len(&self) -> usize {
        self.song_ids.len()
    }

    /// Whether the playlist has no songs
    pub fn is_empty(&self) -> bool {
        self.song_ids.is_empty()
    }

    /// Append a song unless already present
    ///
    /// Returns true if the playlist changed.
    pub fn insert_song(&mut self, song_id: SongId) -> bool {
        if self.contains(&song_id) {
            return false;
        }
        self.song_ids.push(song_id);
        true
    }

    /// Remove a song
    ///
    /// Returns true if the playlist changed.
    pub fn remove_song(&mut self, song_id: &SongId) -> bool {
        let before = self.song_ids.len();
        self.song_ids.retain(|id| id != song_id);
        self.song_ids.len() != before
    }

    /// `"1 song"` / `"12 songs"`
    pub fn song_count_label(&self) -> String {
        match self.len() {
            1 => "1 song".to_string(),
            n => format!("{} songs", n),
        }
    }
}

/// Rejected playlist name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Playlist name is empty")]
    Empty,

    #[error("Playlist name is {len} characters, limit is {max}")]
    TooLong { len: usize, max: usize },
}

/// Trim and validate a playlist name
pub fn validate_playlist_name(name: &str, max_len: usize) -> Result<String, NameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }

    let len = trimmed.chars().count();
    if len > max_len {
        return Err(NameError::TooLong { len, max: max_len });
    }

    Ok(trimmed.to_string())
}
