//! Wiring between configuration, stores and the player coordinator

use crate::config::{RiffConfig, StorageBackend};
use crate::error::{CliError, Result};
use riff_core::{format_duration_millis, Catalog, Playlist, PlaylistStore, Song, SongId};
use riff_playback::{
    spawn_player, DeleteRequest, PlaybackPhase, PlayerCommand, PlayerCoordinator, PlayerHandle,
    PlayerSnapshot, SimulatedEngine, SyncStats,
};
use riff_remote::RemotePlaylistStore;
use riff_storage::{MemoryPlaylistStore, SqlitePlaylistStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Open the playlist store selected by `config.storage.backend`
pub async fn open_store(config: &RiffConfig) -> Result<Arc<dyn PlaylistStore>> {
    let store: Arc<dyn PlaylistStore> = match config.storage.backend {
        StorageBackend::Sqlite => {
            info!(database_url = %config.storage.database_url, "Opening SQLite store");
            Arc::new(SqlitePlaylistStore::open(&config.storage.database_url).await?)
        }
        StorageBackend::Memory => {
            info!("Using in-memory store");
            Arc::new(MemoryPlaylistStore::new())
        }
        StorageBackend::Remote => {
            let remote = config.remote_config().ok_or_else(|| {
                CliError::Config("remote backend needs remote.url and remote.api_key".into())
            })?;
            info!(url = %remote.url, "Using remote store");
            Arc::new(RemotePlaylistStore::new(remote)?)
        }
    };
    Ok(store)
}

/// What `riff play` should start with
#[derive(Debug, Clone, Default)]
pub struct PlayRequest {
    pub song: Option<String>,
    pub playlist: Option<String>,
    pub shuffle: bool,
}

/// One status line for the now-playing view
pub fn describe(snapshot: &PlayerSnapshot) -> Option<String> {
    let session = &snapshot.session;
    let song = session.current_song.as_ref()?;
    let state = match session.phase {
        PlaybackPhase::Loading => "loading",
        PlaybackPhase::Playing => "playing",
        PlaybackPhase::Paused => "paused",
        PlaybackPhase::Idle => "idle",
    };
    let context = session
        .current_playlist
        .as_ref()
        .map(|p| format!(" [{}]", p.name))
        .unwrap_or_default();

    Some(format!(
        "{state:>7} {} - {}{context} {}/{}",
        song.title,
        song.artist,
        format_duration_millis(session.position_millis),
        song.display_duration(session.duration_millis),
    ))
}

/// A coordinator over the demo catalog, driven by one CLI invocation
pub struct App {
    player: PlayerCoordinator,
    max_name_len: usize,
}

impl App {
    /// Open the configured store and load the owner's playlists
    pub async fn open(config: &RiffConfig) -> Result<Self> {
        let store = open_store(config).await?;
        Self::with_store(config, store, Catalog::demo()).await
    }

    pub async fn with_store(
        config: &RiffConfig,
        store: Arc<dyn PlaylistStore>,
        catalog: Catalog,
    ) -> Result<Self> {
        let engine = SimulatedEngine::new(config.playback.simulated_track_ms, config.tick());
        let mut player =
            PlayerCoordinator::new(Arc::new(engine), store, catalog, config.player_config());

        if !player.load_playlists().await {
            return Err(CliError::Rejected(
                "could not load playlists from the store".into(),
            ));
        }
        Ok(Self {
            player,
            max_name_len: config.playback.max_playlist_name_len,
        })
    }

    pub fn songs(&self) -> &[Song] {
        self.player.catalog().songs()
    }

    pub fn playlists(&self) -> &[Playlist] {
        self.player.playlists()
    }

    /// Song by id
    pub fn song(&self, key: &str) -> Result<Song> {
        self.player
            .catalog()
            .get(&SongId::new(key))
            .cloned()
            .ok_or_else(|| CliError::NotFound(format!("song '{key}'")))
    }

    /// Playlist by id, or by name ignoring case
    pub fn playlist(&self, key: &str) -> Result<Playlist> {
        let playlists = self.player.playlists();
        playlists
            .iter()
            .find(|p| p.id.as_str() == key)
            .or_else(|| playlists.iter().find(|p| p.name.eq_ignore_ascii_case(key)))
            .cloned()
            .ok_or_else(|| CliError::NotFound(format!("playlist '{key}'")))
    }

    /// Songs of a playlist in order, skipping ids the catalog doesn't know
    pub fn playlist_songs(&self, playlist: &Playlist) -> Vec<Song> {
        self.player.catalog().resolve(&playlist.song_ids)
    }

    pub async fn create_playlist(&mut self, name: &str) -> Result<Playlist> {
        self.player.add_playlist(name).await.ok_or_else(|| {
            CliError::Rejected(format!(
                "playlist name must be 1-{} characters and the store must accept it",
                self.max_name_len
            ))
        })
    }

    /// Add a song to each named playlist, returns how many changed
    pub async fn add_song(&mut self, song_key: &str, playlist_keys: &[String]) -> Result<usize> {
        let song = self.song(song_key)?;
        let playlist_ids = playlist_keys
            .iter()
            .map(|key| self.playlist(key).map(|p| p.id))
            .collect::<Result<Vec<_>>>()?;

        let changed = self
            .player
            .add_song_to_multiple_playlists(&song.id, &playlist_ids);
        self.settle().await?;
        Ok(changed)
    }

    pub async fn remove_song(&mut self, song_key: &str, playlist_key: &str) -> Result<bool> {
        let playlist = self.playlist(playlist_key)?;
        let removed = self
            .player
            .remove_song_from_playlist(&SongId::new(song_key), &playlist.id)
            .await;
        self.settle().await?;
        Ok(removed)
    }

    /// Delete through the same confirmation flow the UI uses
    pub async fn delete_playlist(&mut self, playlist_key: &str) -> Result<Playlist> {
        let playlist = self.playlist(playlist_key)?;
        self.player
            .open_delete_confirmation(DeleteRequest::playlist(playlist.clone()));
        self.player.confirm_delete().await;
        self.settle().await?;
        Ok(playlist)
    }

    /// Resolve `request`, then hand the coordinator to a player task that
    /// starts playing it
    pub fn start_playback(self, request: &PlayRequest) -> Result<PlayerHandle> {
        let command = match &request.playlist {
            Some(key) => {
                let playlist = self.playlist(key)?;
                match (&request.song, request.shuffle) {
                    (Some(song), _) => PlayerCommand::PlaySongFromPlaylist {
                        song: self.song(song)?,
                        playlist,
                    },
                    (None, true) => PlayerCommand::ShufflePlaylist(playlist),
                    (None, false) => PlayerCommand::PlayPlaylist(playlist),
                }
            }
            None => {
                let song = match &request.song {
                    Some(key) => self.song(key)?,
                    None => self
                        .songs()
                        .first()
                        .cloned()
                        .ok_or_else(|| CliError::NotFound("any song in the catalog".into()))?,
                };
                PlayerCommand::PlaySong(song)
            }
        };

        let handle = spawn_player(self.player);
        handle.send(command)?;
        handle.send(PlayerCommand::OpenNowPlaying)?;
        Ok(handle)
    }

    /// Wait for queued writes and fail if any of them were rejected
    async fn settle(&mut self) -> Result<SyncStats> {
        let stats = self.player.flush_sync().await;
        if stats.failed > 0 {
            warn!(failed = stats.failed, "Playlist changes were not saved");
            return Err(CliError::Rejected(format!(
                "{} playlist change(s) could not be saved",
                stats.failed
            )));
        }
        Ok(stats)
    }

}
