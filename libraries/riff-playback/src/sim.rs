//! Simulated audio engine
//!
//! Plays nothing. Each loaded resource runs a timer that advances its
//! position while playing and reports status like a streaming engine would,
//! including the end-of-track completion. Used by the CLI and for trying the
//! coordinator without an audio device.

use async_trait::async_trait;
use riff_core::{AudioEngine, AudioStatus, LoadError, PlaybackError, SoundHandle, StatusSink};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace};
use url::Url;

/// Engine whose resources are timers
#[derive(Debug, Clone)]
pub struct SimulatedEngine {
    track_millis: u64,
    tick: Duration,
}

impl SimulatedEngine {
    /// Every resource lasts `track_millis` and reports every `tick`
    pub fn new(track_millis: u64, tick: Duration) -> Self {
        Self {
            track_millis,
            tick: tick.max(Duration::from_millis(1)),
        }
    }
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new(30_000, Duration::from_millis(500))
    }
}

#[async_trait]
impl AudioEngine for SimulatedEngine {
    async fn load(&self, uri: &str, status: StatusSink) -> Result<Box<dyn SoundHandle>, LoadError> {
        let url = Url::parse(uri).map_err(|e| LoadError::invalid_uri(uri, e.to_string()))?;
        match url.scheme() {
            "http" | "https" | "file" => {}
            other => {
                return Err(LoadError::invalid_uri(
                    uri,
                    format!("unsupported scheme '{other}'"),
                ))
            }
        }

        debug!(uri, generation = status.generation(), "Simulated load");

        let state = Arc::new(Mutex::new(SimState {
            position_millis: 0,
            duration_millis: self.track_millis,
            playing: false,
            finished: false,
        }));
        status.report(AudioStatus::loaded(0, self.track_millis, false));

        let ticker = tokio::spawn(run_ticker(Arc::clone(&state), status.clone(), self.tick));

        Ok(Box::new(SimulatedSound {
            state,
            status,
            ticker,
        }))
    }
}

#[derive(Debug)]
struct SimState {
    position_millis: u64,
    duration_millis: u64,
    playing: bool,
    finished: bool,
}

impl SimState {
    fn status(&self) -> AudioStatus {
        AudioStatus::loaded(self.position_millis, self.duration_millis, self.playing)
    }
}

async fn run_ticker(state: Arc<Mutex<SimState>>, status: StatusSink, tick: Duration) {
    let step = u64::try_from(tick.as_millis()).unwrap_or(u64::MAX);
    let mut interval = tokio::time::interval(tick);
    // First tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        let mut state = state.lock().await;
        if !state.playing || state.finished {
            continue;
        }

        state.position_millis = state
            .position_millis
            .saturating_add(step)
            .min(state.duration_millis);

        let report = if state.position_millis >= state.duration_millis {
            state.playing = false;
            state.finished = true;
            AudioStatus::finished(state.duration_millis)
        } else {
            state.status()
        };
        drop(state);

        trace!(position_millis = report.position_millis, "Simulated tick");
        if !status.report(report) {
            break;
        }
    }
}

/// One simulated resource
pub struct SimulatedSound {
    state: Arc<Mutex<SimState>>,
    status: StatusSink,
    ticker: JoinHandle<()>,
}

#[async_trait]
impl SoundHandle for SimulatedSound {
    async fn play(&mut self) -> Result<(), PlaybackError> {
        let mut state = self.state.lock().await;
        if state.finished {
            state.position_millis = 0;
            state.finished = false;
        }
        state.playing = true;
        self.status.report(state.status());
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), PlaybackError> {
        let mut state = self.state.lock().await;
        state.playing = false;
        self.status.report(state.status());
        Ok(())
    }

    async fn seek(&mut self, position_millis: u64) -> Result<(), PlaybackError> {
        let mut state = self.state.lock().await;
        state.position_millis = position_millis.min(state.duration_millis);
        state.finished = false;
        self.status.report(state.status());
        Ok(())
    }

    async fn unload(&mut self) -> Result<(), PlaybackError> {
        self.ticker.abort();
        let mut state = self.state.lock().await;
        state.playing = false;
        Ok(())
    }
}

impl Drop for SimulatedSound {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}
