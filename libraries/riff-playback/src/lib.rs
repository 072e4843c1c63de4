//! Riff - Player Coordinator
//!
//! Platform-agnostic playback and playlist coordination for Riff.
//!
//! This crate provides:
//! - Single-resource playback with play / pause / seek / stop
//! - Next / previous navigation with wraparound, in catalog or playlist order
//! - Session-only playlist shuffle
//! - Auto-advance when a song finishes
//! - Optimistic playlist edits synced to a store in the background
//! - Prompt state for now-playing, create, add-to-playlist, detail and delete
//!
//! # Architecture
//!
//! `riff-playback` knows nothing about audio devices, databases or HTTP:
//! - Audio comes from an [`AudioEngine`](riff_core::AudioEngine)
//! - Playlists persist through a [`PlaylistStore`](riff_core::PlaylistStore)
//!
//! [`PlayerCoordinator`] is the state machine. [`spawn_player`] runs one on
//! its own task behind a [`PlayerHandle`].
//!
//! # Example
//!
//! ```rust,no_run
//! use riff_core::{Catalog, PlaylistStore};
//! use riff_playback::{PlayerConfig, PlayerCoordinator, SimulatedEngine};
//! use std::sync::Arc;
//!
//! # async fn run(store: Arc<dyn PlaylistStore>) {
//! let catalog = Catalog::demo();
//! let first = catalog.songs()[0].clone();
//!
//! let mut player = PlayerCoordinator::new(
//!     Arc::new(SimulatedEngine::default()),
//!     store,
//!     catalog,
//!     PlayerConfig::default(),
//! );
//!
//! player.play_song(first).await;
//! player.play_next_song().await;
//! assert_eq!(player.current_song().map(|s| s.id.as_str()), Some("2"));
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod coordinator;
pub mod driver;
pub mod error;
pub mod navigation;
pub mod prompts;
pub mod shuffle;
pub mod sim;
mod sync;
pub mod types;

pub use coordinator::PlayerCoordinator;
pub use driver::{run_player, spawn_player, PlayerCommand, PlayerHandle};
pub use error::{PlayerError, Result};
pub use prompts::{DeleteRequest, PromptState};
pub use sim::SimulatedEngine;
pub use sync::SyncStats;
pub use types::{PlaybackPhase, PlaybackSession, PlayerConfig, PlayerSnapshot};
