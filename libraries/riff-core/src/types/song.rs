//! Song types

use super::ids::SongId;
use serde::{Deserialize, Serialize};

/// Song in the catalog
///
/// Immutable once loaded into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,

    /// Display duration such as `"5:55"`, when the catalog knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Playable resource locator; absent for offline/demo entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Song {
    /// Create a song without uri or duration
    pub fn new(id: impl Into<SongId>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            duration: None,
            uri: None,
        }
    }

    /// Attach a playable uri
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Attach a display duration
    #[must_use]
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// Whether the song can be handed to an audio engine
    pub fn is_playable(&self) -> bool {
        self.uri.as_deref().is_some_and(|uri| !uri.trim().is_empty())
    }

    /// Display duration, falling back to playback metadata
    pub fn display_duration(&self, duration_millis: u64) -> String {
        match &self.duration {
            Some(duration) => duration.clone(),
            None => format_duration_millis(duration_millis),
        }
    }
}

/// Format milliseconds as `m:ss`
pub fn format_duration_millis(millis: u64) -> String {
    let total_secs = millis / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
