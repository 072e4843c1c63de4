//! Audio engine contract
//!
//! The player never decodes audio itself. It asks an engine to open a uri and
//! drives the returned handle; the engine pushes progress through the
//! [`StatusSink`] it was given.

use crate::error::{LoadError, PlaybackError};
use crate::status::StatusSink;
use async_trait::async_trait;

/// Opens playable resources
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Open `uri` for playback
    ///
    /// The engine reports status for this resource through `status` until the
    /// handle is unloaded. Loading does not start playback.
    ///
    /// # Errors
    /// Returns `LoadError` if the resource cannot be opened
    async fn load(&self, uri: &str, status: StatusSink) -> Result<Box<dyn SoundHandle>, LoadError>;
}

/// One opened resource
///
/// At most one handle is alive per player; it must be unloaded before the
/// next one is requested.
#[async_trait]
pub trait SoundHandle: Send {
    /// Start or resume playback
    async fn play(&mut self) -> Result<(), PlaybackError>;

    /// Pause playback
    async fn pause(&mut self) -> Result<(), PlaybackError>;

    /// Seek to `position_millis` from the start
    async fn seek(&mut self, position_millis: u64) -> Result<(), PlaybackError>;

    /// Release the resource
    ///
    /// No status may be reported for this handle afterwards; late reports
    /// are discarded by generation anyway.
    async fn unload(&mut self) -> Result<(), PlaybackError>;
}
