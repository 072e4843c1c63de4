//! Playback status reporting
//!
//! An audio engine reports progress asynchronously. Every load is tagged with
//! a generation number; the engine gets a [`StatusSink`] bound to that
//! generation, so anything it reports after being superseded can be told
//! apart and discarded by the receiver.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// Snapshot of a resource's playback status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioStatus {
    pub is_loaded: bool,
    pub position_millis: u64,
    pub duration_millis: u64,
    pub is_playing: bool,
    pub is_buffering: bool,
    pub did_just_finish: bool,
    pub is_looping: bool,
}

impl AudioStatus {
    /// Loaded status at `position_millis` of `duration_millis`
    pub fn loaded(position_millis: u64, duration_millis: u64, is_playing: bool) -> Self {
        Self {
            is_loaded: true,
            position_millis,
            duration_millis,
            is_playing,
            ..Self::default()
        }
    }

    /// Status reported when the resource reaches its end
    pub fn finished(duration_millis: u64) -> Self {
        Self {
            is_loaded: true,
            position_millis: duration_millis,
            duration_millis,
            is_playing: false,
            is_buffering: false,
            did_just_finish: true,
            is_looping: false,
        }
    }

    /// Whether this status should trigger auto-advance
    pub fn is_completion(&self) -> bool {
        self.is_loaded && self.did_just_finish && !self.is_looping
    }
}

/// One message from the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusUpdate {
    /// Regular status tick
    Status(AudioStatus),

    /// The resource failed after loading
    Error(String),
}

/// Status update tagged with the load it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedStatus {
    pub generation: u64,
    pub update: StatusUpdate,
}

/// Sending half handed to the engine on every load
#[derive(Debug, Clone)]
pub struct StatusSink {
    generation: u64,
    tx: UnboundedSender<TaggedStatus>,
}

impl StatusSink {
    /// Bind a sender to a load generation
    pub fn new(generation: u64, tx: UnboundedSender<TaggedStatus>) -> Self {
        Self { generation, tx }
    }

    /// Generation this sink reports for
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Report a status tick
    ///
    /// Returns false once the receiving player is gone.
    pub fn report(&self, status: AudioStatus) -> bool {
        self.send(StatusUpdate::Status(status))
    }

    /// Report a failure on the loaded resource
    pub fn report_error(&self, message: impl Into<String>) -> bool {
        self.send(StatusUpdate::Error(message.into()))
    }

    /// Send any update
    pub fn send(&self, update: StatusUpdate) -> bool {
        self.tx
            .send(TaggedStatus {
                generation: self.generation,
                update,
            })
            .is_ok()
    }
}
