//! Domain types

mod ids;
mod playlist;
mod song;

pub use ids::{PlaylistId, SongId, UserId};
pub use playlist::{validate_playlist_name, NameError, Playlist, MAX_PLAYLIST_NAME_LEN};
pub use song::{format_duration_millis, Song};
