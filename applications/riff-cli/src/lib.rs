//! Riff command-line front end
//!
//! Wires a [`RiffConfig`] to a playlist store, the simulated audio engine
//! and the demo catalog, and exposes the player operations as subcommands.

pub mod app;
pub mod config;
pub mod error;

pub use app::{describe, open_store, App, PlayRequest};
pub use config::{RiffConfig, StorageBackend};
pub use error::{CliError, Result};
