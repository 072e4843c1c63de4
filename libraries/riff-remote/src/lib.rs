//! Riff remote playlist store
//!
//! [`PlaylistStore`](riff_core::PlaylistStore) implementation for a hosted
//! `playlists` table exposed over a PostgREST-style REST API.
//!
//! # Features
//!
//! - **Owner scoping**: rows are filtered by `user_id`
//! - **Opaque ids**: numeric ids from the server are kept as strings
//! - **Error mapping**: HTTP failures convert into [`SyncError`](riff_core::SyncError)
//!
//! # Example
//!
//! ```ignore
//! use riff_core::PlaylistStore;
//! use riff_remote::{RemoteConfig, RemotePlaylistStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RemoteConfig::new("https://abc.example.co", "anon-key");
//!     let store = RemotePlaylistStore::new(config)?;
//!
//!     let owner = riff_core::UserId::new("user-1");
//!     for playlist in store.list(Some(&owner)).await? {
//!         println!("{} ({} songs)", playlist.name, playlist.len());
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::RemotePlaylistStore;
pub use error::{RemoteStoreError, Result};
pub use types::RemoteConfig;
