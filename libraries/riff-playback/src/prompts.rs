//! Modal prompt state
//!
//! The coordinator tracks which prompts are open and what each one is about,
//! so any UI surface can render them from a snapshot. Opening an open prompt
//! or closing a closed one is a no-op.

use riff_core::{Playlist, PlaylistId, Song};
use serde::Serialize;

/// A destructive action waiting for confirmation
///
/// The request carries everything needed to perform the action, so confirming
/// it runs exactly the deletion that was shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DeleteRequest {
    /// Delete a whole playlist
    Playlist { playlist: Playlist },

    /// Remove one song from a playlist
    Song { song: Song, playlist_id: PlaylistId },
}

impl DeleteRequest {
    /// Confirm deleting `playlist`
    pub fn playlist(playlist: Playlist) -> Self {
        Self::Playlist { playlist }
    }

    /// Confirm removing `song` from the playlist `playlist_id`
    pub fn song(song: Song, playlist_id: PlaylistId) -> Self {
        Self::Song { song, playlist_id }
    }

    /// Prompt title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Playlist { .. } => "Delete Playlist?",
            Self::Song { .. } => "Delete Song?",
        }
    }

    /// Prompt body
    pub fn message(&self) -> String {
        match self {
            Self::Playlist { playlist } => {
                format!("Are you sure you want to delete \"{}\"?", playlist.name)
            }
            Self::Song { song, .. } => {
                format!(
                    "Are you sure you want to remove \"{}\" from this playlist?",
                    song.title
                )
            }
        }
    }
}

/// Visibility and payload of every prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PromptState {
    pub now_playing_visible: bool,
    pub create_playlist_visible: bool,

    /// Song being added to playlists; `Some` while the prompt is open
    pub add_to_playlist: Option<Song>,

    /// Playlist shown in the detail view; `Some` while it is open
    pub playlist_detail: Option<PlaylistId>,

    /// Pending deletion; `Some` while the confirmation is open
    pub delete_confirmation: Option<DeleteRequest>,
}

impl PromptState {
    pub fn add_to_playlist_visible(&self) -> bool {
        self.add_to_playlist.is_some()
    }

    pub fn playlist_detail_visible(&self) -> bool {
        self.playlist_detail.is_some()
    }

    pub fn delete_confirmation_visible(&self) -> bool {
        self.delete_confirmation.is_some()
    }

    /// Returns true if the state changed
    pub fn set_now_playing(&mut self, visible: bool) -> bool {
        std::mem::replace(&mut self.now_playing_visible, visible) != visible
    }

    /// Returns true if the state changed
    pub fn set_create_playlist(&mut self, visible: bool) -> bool {
        std::mem::replace(&mut self.create_playlist_visible, visible) != visible
    }

    pub fn open_add_to_playlist(&mut self, song: Song) -> bool {
        replace_payload(&mut self.add_to_playlist, Some(song))
    }

    pub fn close_add_to_playlist(&mut self) -> bool {
        replace_payload(&mut self.add_to_playlist, None)
    }

    pub fn open_playlist_detail(&mut self, playlist_id: PlaylistId) -> bool {
        replace_payload(&mut self.playlist_detail, Some(playlist_id))
    }

    pub fn close_playlist_detail(&mut self) -> bool {
        replace_payload(&mut self.playlist_detail, None)
    }

    pub fn open_delete_confirmation(&mut self, request: DeleteRequest) -> bool {
        replace_payload(&mut self.delete_confirmation, Some(request))
    }

    pub fn close_delete_confirmation(&mut self) -> bool {
        replace_payload(&mut self.delete_confirmation, None)
    }

    /// Close the confirmation and hand back its request
    pub fn take_delete_confirmation(&mut self) -> Option<DeleteRequest> {
        self.delete_confirmation.take()
    }
}

fn replace_payload<T: PartialEq>(slot: &mut Option<T>, value: Option<T>) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use riff_core::SongId;

    fn song() -> Song {
        Song::new("7", "Night Drive", "SoundHelix")
    }

    #[test]
    fn open_and_close_are_idempotent() {
        let mut prompts = PromptState::default();

        assert!(prompts.set_now_playing(true));
        assert!(!prompts.set_now_playing(true));
        assert!(prompts.now_playing_visible);

        assert!(prompts.set_now_playing(false));
        assert!(!prompts.set_now_playing(false));

        assert!(!prompts.close_add_to_playlist());
        assert!(prompts.open_add_to_playlist(song()));
        assert!(!prompts.open_add_to_playlist(song()));
        assert!(prompts.add_to_playlist_visible());
        assert!(prompts.close_add_to_playlist());
        assert!(!prompts.add_to_playlist_visible());
    }

    #[test]
    fn closing_clears_payload() {
        let mut prompts = PromptState::default();
        prompts.open_playlist_detail(PlaylistId::new("p1"));
        prompts.open_delete_confirmation(DeleteRequest::song(song(), PlaylistId::new("p1")));

        prompts.close_playlist_detail();
        prompts.close_delete_confirmation();

        assert!(prompts.playlist_detail.is_none());
        assert!(prompts.delete_confirmation.is_none());
    }

    #[test]
    fn take_confirmation_only_once() {
        let mut prompts = PromptState::default();
        let playlist = Playlist::new(PlaylistId::new("p1"), "Chill");
        prompts.open_delete_confirmation(DeleteRequest::playlist(playlist.clone()));

        assert_eq!(
            prompts.take_delete_confirmation(),
            Some(DeleteRequest::playlist(playlist))
        );
        assert_eq!(prompts.take_delete_confirmation(), None);
        assert!(!prompts.delete_confirmation_visible());
    }

    #[test]
    fn delete_request_wording() {
        let playlist = DeleteRequest::playlist(Playlist::new(PlaylistId::new("p1"), "Chill"));
        assert_eq!(playlist.title(), "Delete Playlist?");
        assert_eq!(playlist.message(), "Are you sure you want to delete \"Chill\"?");

        let song = DeleteRequest::song(song(), PlaylistId::new("p1"));
        assert_eq!(song.title(), "Delete Song?");
        assert_eq!(
            song.message(),
            "Are you sure you want to remove \"Night Drive\" from this playlist?"
        );
    }

    #[test]
    fn delete_request_serializes_with_kind_tag() {
        let request = DeleteRequest::song(Song::new(SongId::new("1"), "A", "B"), PlaylistId::new("p"));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["kind"], "song");
        assert_eq!(json["playlist_id"], "p");
    }
}
