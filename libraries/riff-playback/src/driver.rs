//! Command-driven player task
//!
//! Runs a [`PlayerCoordinator`] on its own task. Callers send
//! [`PlayerCommand`]s through a [`PlayerHandle`] and watch snapshots; engine
//! status is applied between commands, so the coordinator never sees two
//! operations at once.

use crate::{
    coordinator::PlayerCoordinator,
    error::{PlayerError, Result},
    prompts::DeleteRequest,
    sync::SyncStats,
    types::PlayerSnapshot,
};
use riff_core::{Playlist, PlaylistId, Song, SongId, UserId};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Commands understood by the player task
#[derive(Debug)]
pub enum PlayerCommand {
    PlaySong(Song),
    PlaySongFromPlaylist { song: Song, playlist: Playlist },
    PlayPlaylist(Playlist),
    ShufflePlaylist(Playlist),
    TogglePlayPause,
    Next,
    Previous,
    Seek(u64),
    Stop,

    LoadPlaylists,
    SetOwner(Option<UserId>),
    AddPlaylist {
        name: String,
        reply: Option<oneshot::Sender<Option<Playlist>>>,
    },
    AddSongToPlaylists {
        song_id: SongId,
        playlist_ids: Vec<PlaylistId>,
    },
    RemoveSongFromPlaylist {
        song_id: SongId,
        playlist_id: PlaylistId,
    },
    DeletePlaylist(PlaylistId),

    OpenNowPlaying,
    CloseNowPlaying,
    OpenCreatePlaylist,
    CloseCreatePlaylist,
    OpenAddToPlaylist(Song),
    CloseAddToPlaylist,
    OpenPlaylistDetail(PlaylistId),
    ClosePlaylistDetail,
    OpenDeleteConfirmation(DeleteRequest),
    CloseDeleteConfirmation,
    ConfirmDelete,

    /// Reply once queued playlist changes have reached the store
    Flush(oneshot::Sender<SyncStats>),

    Shutdown,
}

/// Handle to a running player task
pub struct PlayerHandle {
    commands: mpsc::UnboundedSender<PlayerCommand>,
    snapshots: watch::Receiver<PlayerSnapshot>,
    task: JoinHandle<()>,
}

impl PlayerHandle {
    /// Queue a command
    pub fn send(&self, command: PlayerCommand) -> Result<()> {
        self.commands.send(command).map_err(|_| PlayerError::Stopped)
    }

    /// Latest published state
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Watch state changes
    pub fn subscribe(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshots.clone()
    }

    /// Create a playlist and wait for the result
    pub async fn add_playlist(&self, name: impl Into<String>) -> Result<Option<Playlist>> {
        let (reply, rx) = oneshot::channel();
        self.send(PlayerCommand::AddPlaylist {
            name: name.into(),
            reply: Some(reply),
        })?;
        rx.await.map_err(|_| PlayerError::NoReply("add_playlist"))
    }

    /// Wait for every command sent so far, and the playlist sync they queued
    pub async fn flush(&self) -> Result<SyncStats> {
        let (reply, rx) = oneshot::channel();
        self.send(PlayerCommand::Flush(reply))?;
        rx.await.map_err(|_| PlayerError::NoReply("flush"))
    }

    /// Stop the player task and wait for it to finish
    pub async fn shutdown(self) -> Result<PlayerSnapshot> {
        // Already-stopped players still hand back their last state
        let _ = self.commands.send(PlayerCommand::Shutdown);
        self.task.await.map_err(|_| PlayerError::Stopped)?;
        Ok(self.snapshots.borrow().clone())
    }
}

/// Spawn `coordinator` on its own task
pub fn spawn_player(coordinator: PlayerCoordinator) -> PlayerHandle {
    let (commands, rx) = mpsc::unbounded_channel();
    let snapshots = coordinator.subscribe();
    let task = tokio::spawn(run_player(coordinator, rx));

    PlayerHandle {
        commands,
        snapshots,
        task,
    }
}

/// Run the command loop until `Shutdown` or every sender is gone
pub async fn run_player(
    mut coordinator: PlayerCoordinator,
    mut commands: mpsc::UnboundedReceiver<PlayerCommand>,
) {
    info!("Player task started");

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(PlayerCommand::Shutdown) | None => break,
                Some(command) => execute(&mut coordinator, command).await,
            },
            Some(status) = coordinator.recv_status() => {
                coordinator.handle_status(status).await;
            }
        }
    }

    coordinator.shutdown().await;
    info!("Player task stopped");
}

async fn execute(coordinator: &mut PlayerCoordinator, command: PlayerCommand) {
    debug!(?command, "Player command");

    match command {
        PlayerCommand::PlaySong(song) => coordinator.play_song(song).await,
        PlayerCommand::PlaySongFromPlaylist { song, playlist } => {
            coordinator.play_song_from_playlist(song, playlist).await;
        }
        PlayerCommand::PlayPlaylist(playlist) => coordinator.play_playlist(playlist).await,
        PlayerCommand::ShufflePlaylist(playlist) => coordinator.shuffle_playlist(playlist).await,
        PlayerCommand::TogglePlayPause => coordinator.toggle_play_pause().await,
        PlayerCommand::Next => coordinator.play_next_song().await,
        PlayerCommand::Previous => coordinator.play_previous_song().await,
        PlayerCommand::Seek(position_millis) => coordinator.seek_to_position(position_millis).await,
        PlayerCommand::Stop => coordinator.stop().await,

        PlayerCommand::LoadPlaylists => {
            coordinator.load_playlists().await;
        }
        PlayerCommand::SetOwner(owner) => coordinator.set_owner(owner).await,
        PlayerCommand::AddPlaylist { name, reply } => {
            let created = coordinator.add_playlist(&name).await;
            if let Some(reply) = reply {
                let _ = reply.send(created);
            }
        }
        PlayerCommand::AddSongToPlaylists {
            song_id,
            playlist_ids,
        } => {
            coordinator.add_song_to_multiple_playlists(&song_id, &playlist_ids);
        }
        PlayerCommand::RemoveSongFromPlaylist {
            song_id,
            playlist_id,
        } => {
            coordinator
                .remove_song_from_playlist(&song_id, &playlist_id)
                .await;
        }
        PlayerCommand::DeletePlaylist(playlist_id) => {
            coordinator.delete_playlist(&playlist_id).await;
        }

        PlayerCommand::OpenNowPlaying => coordinator.open_now_playing(),
        PlayerCommand::CloseNowPlaying => coordinator.close_now_playing(),
        PlayerCommand::OpenCreatePlaylist => coordinator.open_create_playlist(),
        PlayerCommand::CloseCreatePlaylist => coordinator.close_create_playlist(),
        PlayerCommand::OpenAddToPlaylist(song) => coordinator.open_add_to_playlist(song),
        PlayerCommand::CloseAddToPlaylist => coordinator.close_add_to_playlist(),
        PlayerCommand::OpenPlaylistDetail(playlist_id) => {
            coordinator.open_playlist_detail(playlist_id);
        }
        PlayerCommand::ClosePlaylistDetail => coordinator.close_playlist_detail(),
        PlayerCommand::OpenDeleteConfirmation(request) => {
            coordinator.open_delete_confirmation(request);
        }
        PlayerCommand::CloseDeleteConfirmation => coordinator.close_delete_confirmation(),
        PlayerCommand::ConfirmDelete => {
            coordinator.confirm_delete().await;
        }

        PlayerCommand::Flush(reply) => {
            let stats = coordinator.flush_sync().await;
            let _ = reply.send(stats);
        }

        // Handled by the loop
        PlayerCommand::Shutdown => {}
    }
}
