//! Riff Core
//!
//! Platform-agnostic domain types, errors, and adapter contracts for Riff.
//!
//! This crate provides the building blocks shared by the player coordinator
//! and every playlist store implementation.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `Playlist`, `Catalog` and their ids
//! - **Adapter Traits**: `AudioEngine` / `SoundHandle` for playback,
//!   `PlaylistStore` for durable playlists
//! - **Status Channel**: `StatusSink`, the generation-tagged path an engine
//!   uses to report progress back to the coordinator
//! - **Error Handling**: `LoadError`, `PlaybackError`, `SyncError`
//!
//! # Example
//!
//! ```rust
//! use riff_core::{Catalog, Playlist, PlaylistId, Song, SongId};
//!
//! let catalog = Catalog::new(vec![
//!     Song::new("a", "First", "Artist").with_uri("https://example.com/a.mp3"),
//!     Song::new("b", "Second", "Artist").with_uri("https://example.com/b.mp3"),
//! ]);
//!
//! let mut playlist = Playlist::new(PlaylistId::new("p1"), "Road Trip");
//! playlist.insert_song(SongId::new("b"));
//!
//! let songs = catalog.resolve(&playlist.song_ids);
//! assert_eq!(songs[0].title, "Second");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod status;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use catalog::Catalog;
pub use error::{LoadError, PlaybackError, SyncError};
pub use status::{AudioStatus, StatusSink, StatusUpdate, TaggedStatus};
pub use storage::PlaylistStore;
pub use traits::{AudioEngine, SoundHandle};
pub use types::{
    format_duration_millis, validate_playlist_name, NameError, Playlist, PlaylistId, Song, SongId,
    UserId, MAX_PLAYLIST_NAME_LEN,
};
