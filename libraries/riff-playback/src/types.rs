//! Core types for the player coordinator

use crate::prompts::PromptState;
use riff_core::{Catalog, Playlist, Song, UserId, MAX_PLAYLIST_NAME_LEN};
use serde::{Deserialize, Serialize};

/// Playback phase
///
/// `Idle` → `Loading` → `Playing` / `Paused`. Any play or navigation call
/// goes back through `Loading`; a failed load ends in `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackPhase {
    /// No resource
    #[default]
    Idle,

    /// Resource requested, not ready yet
    Loading,

    /// Resource loaded and playing
    Playing,

    /// Resource loaded and paused
    Paused,
}

impl PlaybackPhase {
    /// Whether a resource is loaded and can take transport commands
    pub fn is_ready(self) -> bool {
        matches!(self, PlaybackPhase::Playing | PlaybackPhase::Paused)
    }
}

/// Live playback session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaybackSession {
    pub current_song: Option<Song>,

    /// Navigation context; `None` means catalog order
    pub current_playlist: Option<Playlist>,

    pub is_playing: bool,
    pub position_millis: u64,
    pub duration_millis: u64,
    pub is_buffering: bool,
    pub is_loaded: bool,
    pub last_error: Option<String>,
    pub phase: PlaybackPhase,
}

impl PlaybackSession {
    /// Playback progress in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.duration_millis == 0 {
            return 0.0;
        }
        (self.position_millis as f64 / self.duration_millis as f64).clamp(0.0, 1.0)
    }

    /// Reset metrics for a new resource
    pub(crate) fn begin_loading(&mut self, song: Song) {
        self.current_song = Some(song);
        self.is_playing = false;
        self.position_millis = 0;
        self.duration_millis = 0;
        self.is_buffering = false;
        self.is_loaded = false;
        self.last_error = None;
        self.phase = PlaybackPhase::Loading;
    }

    /// Forget the current song and context
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Configuration for the player coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Signed-in owner used to scope playlist listing (default: none)
    pub owner: Option<UserId>,

    /// Longest accepted playlist name (default: 50)
    pub max_playlist_name_len: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            owner: None,
            max_playlist_name_len: MAX_PLAYLIST_NAME_LEN,
        }
    }
}

impl PlayerConfig {
    /// Config scoped to a signed-in owner
    pub fn for_owner(owner: impl Into<UserId>) -> Self {
        Self {
            owner: Some(owner.into()),
            ..Self::default()
        }
    }
}

/// Read-only view of the whole player, published to UI surfaces
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub catalog: Catalog,
    pub session: PlaybackSession,
    pub playlists: Vec<Playlist>,
    pub prompts: PromptState,
    pub owner: Option<UserId>,
}

impl PlayerSnapshot {
    /// Playlist currently shown in the detail view, from the live collection
    pub fn selected_playlist(&self) -> Option<&Playlist> {
        let id = self.prompts.playlist_detail.as_ref()?;
        self.playlists.iter().find(|playlist| &playlist.id == id)
    }
}
