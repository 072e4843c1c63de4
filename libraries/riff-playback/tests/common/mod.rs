//! Shared test infrastructure: recording fakes for the engine and the store

#![allow(dead_code)]

use async_trait::async_trait;
use riff_core::{
    AudioEngine, Catalog, LoadError, PlaybackError, Playlist, PlaylistId, PlaylistStore, Song,
    SongId, SoundHandle, StatusSink, SyncError, UserId,
};
use riff_playback::{PlayerConfig, PlayerCoordinator};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

// ============================================================================
// Catalog
// ============================================================================

pub fn uri(id: &str) -> String {
    format!("https://cdn.test/{id}.mp3")
}

/// Five playable songs: a, b, c, d, e
pub fn catalog() -> Catalog {
    Catalog::new(
        ["a", "b", "c", "d", "e"]
            .iter()
            .map(|id| Song::new(*id, id.to_uppercase(), "Test Artist").with_uri(uri(id)))
            .collect(),
    )
}

pub fn song(id: &str) -> Song {
    catalog()
        .get(&SongId::new(id))
        .cloned()
        .unwrap_or_else(|| panic!("no song {id} in test catalog"))
}

pub fn ids(ids: &[&str]) -> Vec<SongId> {
    ids.iter().map(|id| SongId::new(*id)).collect()
}

pub fn playlist(id: &str, name: &str, songs: &[&str]) -> Playlist {
    Playlist::with_songs(PlaylistId::new(id), name, ids(songs))
}

/// road = [b, c], solo = [d], empty = []
pub fn default_playlists() -> Vec<Playlist> {
    vec![
        playlist("road", "Road Trip", &["b", "c"]),
        playlist("solo", "Solo", &["d"]),
        playlist("empty", "Empty", &[]),
    ]
}

pub const OWNER: &str = "user-1";

// ============================================================================
// Recording audio engine
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Load(String),
    Play(String),
    Pause(String),
    Seek(String, u64),
    Unload(String),
}

#[derive(Default)]
struct EngineState {
    events: Vec<EngineEvent>,
    sinks: Vec<StatusSink>,
    live: usize,
    max_live: usize,
    failing_uris: HashSet<String>,
    fail_play: bool,
}

/// Engine that records every call and hands out controllable status sinks
#[derive(Clone, Default)]
pub struct RecordingEngine {
    state: Arc<Mutex<EngineState>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_uri(&self, uri: impl Into<String>) {
        self.state.lock().unwrap().failing_uris.insert(uri.into());
    }

    pub fn set_fail_play(&self, fail: bool) {
        self.state.lock().unwrap().fail_play = fail;
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.lock().unwrap().events.clear();
    }

    pub fn loads(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                EngineEvent::Load(uri) => Some(uri),
                _ => None,
            })
            .collect()
    }

    /// Resources loaded and not yet unloaded
    pub fn live(&self) -> usize {
        self.state.lock().unwrap().live
    }

    pub fn max_live(&self) -> usize {
        self.state.lock().unwrap().max_live
    }

    /// Sink handed to the most recent successful load
    pub fn last_sink(&self) -> StatusSink {
        self.try_last_sink().expect("nothing loaded yet")
    }

    pub fn try_last_sink(&self) -> Option<StatusSink> {
        self.state.lock().unwrap().sinks.last().cloned()
    }
}

#[async_trait]
impl AudioEngine for RecordingEngine {
    async fn load(&self, uri: &str, status: StatusSink) -> Result<Box<dyn SoundHandle>, LoadError> {
        let mut state = self.state.lock().unwrap();
        state.events.push(EngineEvent::Load(uri.to_string()));

        if state.failing_uris.contains(uri) {
            return Err(LoadError::engine(format!("cannot open {uri}")));
        }

        state.live += 1;
        state.max_live = state.max_live.max(state.live);
        state.sinks.push(status);

        Ok(Box::new(RecordingSound {
            uri: uri.to_string(),
            state: Arc::clone(&self.state),
            unloaded: false,
        }))
    }
}

struct RecordingSound {
    uri: String,
    state: Arc<Mutex<EngineState>>,
    unloaded: bool,
}

#[async_trait]
impl SoundHandle for RecordingSound {
    async fn play(&mut self) -> Result<(), PlaybackError> {
        let mut state = self.state.lock().unwrap();
        state.events.push(EngineEvent::Play(self.uri.clone()));
        if state.fail_play {
            return Err(PlaybackError::transport("output device busy"));
        }
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), PlaybackError> {
        let mut state = self.state.lock().unwrap();
        state.events.push(EngineEvent::Pause(self.uri.clone()));
        Ok(())
    }

    async fn seek(&mut self, position_millis: u64) -> Result<(), PlaybackError> {
        let mut state = self.state.lock().unwrap();
        state
            .events
            .push(EngineEvent::Seek(self.uri.clone(), position_millis));
        Ok(())
    }

    async fn unload(&mut self) -> Result<(), PlaybackError> {
        let mut state = self.state.lock().unwrap();
        state.events.push(EngineEvent::Unload(self.uri.clone()));
        if !self.unloaded {
            self.unloaded = true;
            state.live -= 1;
        }
        Ok(())
    }
}

// ============================================================================
// Recording playlist store
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List(Option<String>),
    Create(String),
    UpdateMembership(String, Vec<String>),
    Delete(String),
}

#[derive(Default)]
struct StoreState {
    playlists: Vec<Playlist>,
    calls: Vec<StoreCall>,
    fail_list: bool,
    fail_create: bool,
    fail_writes: bool,
    next_id: u32,
}

/// In-memory store that records calls and can be told to fail
#[derive(Clone, Default)]
pub struct RecordingStore {
    state: Arc<Mutex<StoreState>>,
}

impl RecordingStore {
    pub fn with_playlists(playlists: Vec<Playlist>) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().playlists = playlists;
        store
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn membership_updates(&self) -> Vec<(String, Vec<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::UpdateMembership(id, songs) => Some((id, songs)),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Delete(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn creates(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Create(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn stored(&self, id: &str) -> Option<Playlist> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .find(|p| p.id.as_str() == id)
            .cloned()
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.state.lock().unwrap().fail_list = fail;
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.state.lock().unwrap().fail_create = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }
}

#[async_trait]
impl PlaylistStore for RecordingStore {
    async fn list(&self, owner: Option<&UserId>) -> Result<Vec<Playlist>, SyncError> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(StoreCall::List(owner.map(|o| o.as_str().to_string())));
        if state.fail_list {
            return Err(SyncError::network("connection refused"));
        }
        if owner.is_none() {
            return Ok(Vec::new());
        }
        Ok(state.playlists.clone())
    }

    async fn create(&self, _owner: Option<&UserId>, name: &str) -> Result<Playlist, SyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Create(name.to_string()));
        if state.fail_create {
            return Err(SyncError::network("connection refused"));
        }
        state.next_id += 1;
        let playlist = Playlist::new(PlaylistId::new(format!("new-{}", state.next_id)), name);
        state.playlists.push(playlist.clone());
        Ok(playlist)
    }

    async fn update_membership(
        &self,
        playlist_id: &PlaylistId,
        song_ids: &[SongId],
    ) -> Result<(), SyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::UpdateMembership(
            playlist_id.to_string(),
            song_ids.iter().map(ToString::to_string).collect(),
        ));
        if state.fail_writes {
            return Err(SyncError::storage("disk full"));
        }
        match state.playlists.iter_mut().find(|p| &p.id == playlist_id) {
            Some(playlist) => {
                playlist.song_ids = song_ids.to_vec();
                Ok(())
            }
            None => Err(SyncError::PlaylistNotFound(playlist_id.clone())),
        }
    }

    async fn delete(&self, playlist_id: &PlaylistId) -> Result<(), SyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Delete(playlist_id.to_string()));
        if state.fail_writes {
            return Err(SyncError::storage("disk full"));
        }
        state.playlists.retain(|p| &p.id != playlist_id);
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub player: PlayerCoordinator,
    pub engine: RecordingEngine,
    pub store: RecordingStore,
}

impl Harness {
    /// Coordinator signed in as [`OWNER`] with [`default_playlists`] loaded
    pub async fn new() -> Self {
        Self::with_playlists(default_playlists()).await
    }

    pub async fn with_playlists(playlists: Vec<Playlist>) -> Self {
        let engine = RecordingEngine::new();
        let store = RecordingStore::with_playlists(playlists);
        let mut player = PlayerCoordinator::new(
            Arc::new(engine.clone()),
            Arc::new(store.clone()),
            catalog(),
            PlayerConfig::for_owner(OWNER),
        );
        assert!(player.load_playlists().await);

        Self {
            player,
            engine,
            store,
        }
    }

    /// Playlist from the coordinator's collection
    pub fn playlist(&self, id: &str) -> Playlist {
        self.player
            .playlist(&PlaylistId::new(id))
            .cloned()
            .unwrap_or_else(|| panic!("no playlist {id}"))
    }

    pub fn current_id(&self) -> Option<String> {
        self.player.current_song().map(|s| s.id.to_string())
    }

    pub fn context_id(&self) -> Option<String> {
        self.player.current_playlist().map(|p| p.id.to_string())
    }
}
