//! Player coordinator - core orchestration
//!
//! Owns the playback session, the playlist collection and prompt state, and
//! drives an [`AudioEngine`] and a [`PlaylistStore`]. All mutation goes through
//! `&mut self`, so one coordinator is one logical thread of control; engine
//! status arrives on a channel and is applied with [`PlayerCoordinator::next_status`]
//! or [`PlayerCoordinator::drain_status`].

use crate::{
    navigation::{self, Direction},
    prompts::{DeleteRequest, PromptState},
    shuffle::shuffled_context,
    sync::{SyncStats, SyncWorker},
    types::{PlaybackPhase, PlaybackSession, PlayerConfig, PlayerSnapshot},
};
use riff_core::{
    validate_playlist_name, AudioEngine, Catalog, LoadError, PlaybackError, Playlist, PlaylistId,
    PlaylistStore, Song, SongId, SoundHandle, StatusSink, StatusUpdate, TaggedStatus, UserId,
};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Coordinates playback, playlists and prompts for one listener
pub struct PlayerCoordinator {
    engine: Arc<dyn AudioEngine>,
    store: Arc<dyn PlaylistStore>,
    catalog: Catalog,
    config: PlayerConfig,
    owner: Option<UserId>,

    session: PlaybackSession,
    playlists: Vec<Playlist>,
    prompts: PromptState,

    /// The single live resource
    sound: Option<Box<dyn SoundHandle>>,

    /// Bumped whenever the live resource is released; status tagged with an
    /// older value belongs to a superseded resource
    generation: u64,
    status_tx: mpsc::UnboundedSender<TaggedStatus>,
    status_rx: mpsc::UnboundedReceiver<TaggedStatus>,

    sync: SyncWorker,
    snapshots: watch::Sender<PlayerSnapshot>,
}

impl PlayerCoordinator {
    /// Create a coordinator
    ///
    /// Spawns the playlist sync worker, so this must be called inside a Tokio
    /// runtime. Playlists are not loaded until [`Self::load_playlists`].
    pub fn new(
        engine: Arc<dyn AudioEngine>,
        store: Arc<dyn PlaylistStore>,
        catalog: Catalog,
        config: PlayerConfig,
    ) -> Self {
        let (status_tx, status_rx) = mpsc::unbounded_channel();
        let owner = config.owner.clone();
        let sync = SyncWorker::spawn(Arc::clone(&store));

        let initial = PlayerSnapshot {
            catalog: catalog.clone(),
            owner: owner.clone(),
            ..PlayerSnapshot::default()
        };
        let (snapshots, _) = watch::channel(initial);

        Self {
            engine,
            store,
            catalog,
            config,
            owner,
            session: PlaybackSession::default(),
            playlists: Vec::new(),
            prompts: PromptState::default(),
            sound: None,
            generation: 0,
            status_tx,
            status_rx,
            sync,
            snapshots,
        }
    }

    // ===== State =====

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn current_song(&self) -> Option<&Song> {
        self.session.current_song.as_ref()
    }

    pub fn current_playlist(&self) -> Option<&Playlist> {
        self.session.current_playlist.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_playing
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.session.phase
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    /// Look up a playlist in the collection
    pub fn playlist(&self, playlist_id: &PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|p| &p.id == playlist_id)
    }

    pub fn prompts(&self) -> &PromptState {
        &self.prompts
    }

    pub fn owner(&self) -> Option<&UserId> {
        self.owner.as_ref()
    }

    /// Current load generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Playlist sync counters
    pub fn sync_stats(&self) -> SyncStats {
        self.sync.stats()
    }

    /// Full read-only view
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            catalog: self.catalog.clone(),
            session: self.session.clone(),
            playlists: self.playlists.clone(),
            prompts: self.prompts.clone(),
            owner: self.owner.clone(),
        }
    }

    /// Receive a fresh snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshots.subscribe()
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }

    // ===== Playback =====

    /// Play a single song with no playlist context
    ///
    /// Navigation afterwards follows catalog order.
    pub async fn play_song(&mut self, song: Song) {
        info!(song_id = %song.id, title = %song.title, "Playing song");
        self.session.current_playlist = None;
        self.load_and_play(song).await;
        self.publish();
    }

    /// Play a song with `playlist` as the navigation context
    ///
    /// If the playlist does not contain the song the context is dropped and
    /// navigation falls back to catalog order.
    pub async fn play_song_from_playlist(&mut self, song: Song, playlist: Playlist) {
        if playlist.contains(&song.id) {
            info!(song_id = %song.id, playlist_id = %playlist.id, "Playing song from playlist");
            self.session.current_playlist = Some(playlist);
        } else {
            warn!(
                song_id = %song.id,
                playlist_id = %playlist.id,
                "Song is not in playlist, playing without context"
            );
            self.session.current_playlist = None;
        }
        self.load_and_play(song).await;
        self.publish();
    }

    /// Play a playlist from its first resolvable song
    ///
    /// Empty or unresolvable playlists leave playback untouched.
    pub async fn play_playlist(&mut self, playlist: Playlist) {
        let Some(first) = self.catalog.resolve(&playlist.song_ids).into_iter().next() else {
            debug!(playlist_id = %playlist.id, "Nothing to play in playlist");
            return;
        };

        info!(playlist_id = %playlist.id, songs = playlist.len(), "Playing playlist");
        self.session.current_playlist = Some(playlist);
        self.load_and_play(first).await;
        self.publish();
    }

    /// Play a playlist in random order
    ///
    /// The shuffled order becomes the navigation context for this session
    /// only; the stored playlist keeps its order.
    pub async fn shuffle_playlist(&mut self, playlist: Playlist) {
        let Some((context, songs)) = shuffled_context(&self.catalog, &playlist) else {
            debug!(playlist_id = %playlist.id, "Nothing to shuffle in playlist");
            return;
        };
        let Some(first) = songs.into_iter().next() else {
            return;
        };

        info!(playlist_id = %playlist.id, songs = context.len(), "Shuffling playlist");
        self.session.current_playlist = Some(context);
        self.load_and_play(first).await;
        self.publish();
    }

    /// Pause if playing, resume otherwise
    ///
    /// Does nothing until a resource has finished loading.
    pub async fn toggle_play_pause(&mut self) {
        if !self.session.phase.is_ready() {
            debug!(phase = ?self.session.phase, "Toggle ignored, nothing loaded");
            return;
        }
        let Some(sound) = self.sound.as_mut() else {
            return;
        };

        if self.session.is_playing {
            match sound.pause().await {
                Ok(()) => {
                    self.session.is_playing = false;
                    self.session.phase = PlaybackPhase::Paused;
                }
                Err(e) => self.record_transport_error("pause", &e),
            }
        } else {
            match sound.play().await {
                Ok(()) => {
                    self.session.is_playing = true;
                    self.session.phase = PlaybackPhase::Playing;
                }
                Err(e) => self.record_transport_error("play", &e),
            }
        }
        self.publish();
    }

    /// Advance to the next song in the active order
    pub async fn play_next_song(&mut self) {
        self.navigate(Direction::Next).await;
        self.publish();
    }

    /// Go back to the previous song in the active order
    pub async fn play_previous_song(&mut self) {
        self.navigate(Direction::Previous).await;
        self.publish();
    }

    /// Seek the live resource
    ///
    /// The new position shows up through the next status report.
    pub async fn seek_to_position(&mut self, position_millis: u64) {
        if !self.session.phase.is_ready() {
            debug!("Seek ignored, nothing loaded");
            return;
        }
        let Some(sound) = self.sound.as_mut() else {
            return;
        };

        debug!(position_millis, "Seeking");
        if let Err(e) = sound.seek(position_millis).await {
            self.record_transport_error("seek", &e);
            self.publish();
        }
    }

    /// Stop playback and forget the current song and context
    pub async fn stop(&mut self) {
        self.stop_playback().await;
        self.publish();
    }

    /// Release the live resource and wait for pending playlist sync
    pub async fn shutdown(&mut self) {
        info!("Shutting down player");
        self.stop_playback().await;
        self.sync.flush().await;
        self.publish();
    }

    // ===== Engine status =====

    /// Wait for the next status message without applying it
    ///
    /// Cancel safe; pair with [`Self::handle_status`].
    pub async fn recv_status(&mut self) -> Option<TaggedStatus> {
        self.status_rx.recv().await
    }

    /// Wait for one status message and apply it
    ///
    /// Returns whether the message was applied (false if it was stale).
    pub async fn next_status(&mut self) -> bool {
        match self.status_rx.recv().await {
            Some(status) => self.handle_status(status).await,
            None => false,
        }
    }

    /// Apply every status message already queued
    ///
    /// Returns the number of messages applied.
    pub async fn drain_status(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(status) = self.status_rx.try_recv() {
            if self.handle_status(status).await {
                applied += 1;
            }
        }
        applied
    }

    /// Apply one status message
    ///
    /// Messages from a superseded resource are discarded. A completion on a
    /// non-looping resource advances to the next song.
    pub async fn handle_status(&mut self, tagged: TaggedStatus) -> bool {
        if tagged.generation != self.generation || self.sound.is_none() {
            debug!(
                generation = tagged.generation,
                current = self.generation,
                "Discarding stale status"
            );
            return false;
        }

        match tagged.update {
            StatusUpdate::Status(status) if status.is_loaded => {
                self.session.is_loaded = true;
                self.session.position_millis = status.position_millis;
                self.session.duration_millis = status.duration_millis;
                self.session.is_playing = status.is_playing;
                self.session.is_buffering = status.is_buffering;
                self.session.phase = if status.is_playing {
                    PlaybackPhase::Playing
                } else {
                    PlaybackPhase::Paused
                };

                if status.is_completion() {
                    info!("Song finished, advancing");
                    self.navigate(Direction::Next).await;
                }
            }
            StatusUpdate::Status(_) => {
                debug!("Engine reports resource unloaded");
                self.session.is_loaded = false;
                self.session.is_playing = false;
                self.session.is_buffering = false;
                self.session.phase = PlaybackPhase::Idle;
            }
            StatusUpdate::Error(message) => {
                warn!(error = %message, "Audio engine error");
                self.session.last_error = Some(message);
            }
        }

        self.publish();
        true
    }

    // ===== Playlists =====

    /// Replace the collection with the owner's stored playlists
    ///
    /// On failure the collection is left as it was.
    pub async fn load_playlists(&mut self) -> bool {
        match self.store.list(self.owner.as_ref()).await {
            Ok(playlists) => {
                info!(count = playlists.len(), "Loaded playlists");
                self.playlists = playlists;
                self.publish();
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to load playlists");
                false
            }
        }
    }

    /// Switch the signed-in owner and reload playlists
    pub async fn set_owner(&mut self, owner: Option<UserId>) {
        if self.owner == owner {
            return;
        }
        info!(owner = ?owner.as_ref().map(UserId::as_str), "Owner changed");

        // Land edits made under the previous owner first
        self.sync.flush().await;
        self.owner = owner;
        if !self.load_playlists().await {
            self.publish();
        }
    }

    /// Create a playlist
    ///
    /// The name is trimmed and must be non-empty and within the configured
    /// length; invalid names never reach the store. Returns the created
    /// playlist, or `None` if the name was rejected or the store failed.
    pub async fn add_playlist(&mut self, name: &str) -> Option<Playlist> {
        let name = match validate_playlist_name(name, self.config.max_playlist_name_len) {
            Ok(name) => name,
            Err(e) => {
                debug!(error = %e, "Rejected playlist name");
                return None;
            }
        };

        match self.store.create(self.owner.as_ref(), &name).await {
            Ok(playlist) => {
                info!(playlist_id = %playlist.id, name = %playlist.name, "Created playlist");
                self.playlists.push(playlist.clone());
                self.publish();
                Some(playlist)
            }
            Err(e) => {
                warn!(name = %name, error = %e, "Failed to create playlist");
                None
            }
        }
    }

    /// Add a song to one playlist
    ///
    /// The collection changes immediately and the store is updated in the
    /// background. Adding a song that is already there does nothing.
    pub fn add_song_to_playlist(&mut self, song_id: &SongId, playlist_id: &PlaylistId) -> bool {
        let changed = self.insert_song(song_id, playlist_id);
        if changed {
            self.publish();
        }
        changed
    }

    /// Add a song to several playlists
    ///
    /// An empty selection is rejected. Returns the number of playlists that
    /// gained the song.
    pub fn add_song_to_multiple_playlists(
        &mut self,
        song_id: &SongId,
        playlist_ids: &[PlaylistId],
    ) -> usize {
        if playlist_ids.is_empty() {
            warn!(song_id = %song_id, "Select at least one playlist");
            return 0;
        }

        let changed = playlist_ids
            .iter()
            .filter(|playlist_id| self.insert_song(song_id, playlist_id))
            .count();
        if changed > 0 {
            self.publish();
        }
        changed
    }

    /// Ids of the playlists that already contain `song_id`
    pub fn playlists_containing(&self, song_id: &SongId) -> Vec<PlaylistId> {
        self.playlists
            .iter()
            .filter(|p| p.contains(song_id))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Remove a song from a playlist
    ///
    /// If that song is playing with this playlist as context, playback moves
    /// to the song that followed it; if nothing else is left, playback stops.
    pub async fn remove_song_from_playlist(
        &mut self,
        song_id: &SongId,
        playlist_id: &PlaylistId,
    ) -> bool {
        let Some(index) = self.playlists.iter().position(|p| &p.id == playlist_id) else {
            debug!(playlist_id = %playlist_id, "Unknown playlist");
            return false;
        };
        if !self.playlists[index].contains(song_id) {
            debug!(song_id = %song_id, playlist_id = %playlist_id, "Song not in playlist");
            return false;
        }

        // Successor must come from the order as it was before removal
        let successor = if self.is_playing_from(song_id, playlist_id) {
            let order = self.playback_order();
            Some(
                navigation::neighbor(&order, song_id, Direction::Next)
                    .filter(|next| &next.id != song_id)
                    .cloned(),
            )
        } else {
            None
        };

        let playlist = &mut self.playlists[index];
        playlist.remove_song(song_id);
        self.sync
            .update_membership(playlist.id.clone(), playlist.song_ids.clone());
        info!(song_id = %song_id, playlist_id = %playlist_id, "Removed song from playlist");

        if let Some(context) = self.session.current_playlist.as_mut() {
            if &context.id == playlist_id {
                context.remove_song(song_id);
            }
        }

        match successor {
            Some(Some(next)) => self.load_and_play(next).await,
            Some(None) => {
                info!(playlist_id = %playlist_id, "Playlist has nothing left to play");
                self.stop_playback().await;
            }
            None => {}
        }

        self.publish();
        true
    }

    /// Delete a playlist
    ///
    /// If it is the active context, playback stops first. The collection
    /// changes even if the store later fails.
    pub async fn delete_playlist(&mut self, playlist_id: &PlaylistId) -> bool {
        let is_context = self
            .session
            .current_playlist
            .as_ref()
            .is_some_and(|p| &p.id == playlist_id);
        if is_context {
            info!(playlist_id = %playlist_id, "Deleting the playing playlist, stopping");
            self.stop_playback().await;
        }

        let before = self.playlists.len();
        self.playlists.retain(|p| &p.id != playlist_id);
        let removed = self.playlists.len() != before;

        if self.prompts.playlist_detail.as_ref() == Some(playlist_id) {
            self.prompts.close_playlist_detail();
        }

        if removed {
            info!(playlist_id = %playlist_id, "Deleted playlist");
            self.sync.delete(playlist_id.clone());
        } else {
            debug!(playlist_id = %playlist_id, "Unknown playlist");
        }

        self.publish();
        removed || is_context
    }

    /// Wait until every queued playlist change has reached the store
    pub async fn flush_sync(&mut self) -> SyncStats {
        self.sync.flush().await;
        self.sync.stats()
    }

    // ===== Prompts =====

    pub fn open_now_playing(&mut self) {
        if self.prompts.set_now_playing(true) {
            self.publish();
        }
    }

    pub fn close_now_playing(&mut self) {
        if self.prompts.set_now_playing(false) {
            self.publish();
        }
    }

    pub fn open_create_playlist(&mut self) {
        if self.prompts.set_create_playlist(true) {
            self.publish();
        }
    }

    pub fn close_create_playlist(&mut self) {
        if self.prompts.set_create_playlist(false) {
            self.publish();
        }
    }

    /// Open the add-to-playlist prompt for `song`
    pub fn open_add_to_playlist(&mut self, song: Song) {
        if self.prompts.open_add_to_playlist(song) {
            self.publish();
        }
    }

    pub fn close_add_to_playlist(&mut self) {
        if self.prompts.close_add_to_playlist() {
            self.publish();
        }
    }

    /// Show a playlist's detail view
    pub fn open_playlist_detail(&mut self, playlist_id: PlaylistId) {
        if self.prompts.open_playlist_detail(playlist_id) {
            self.publish();
        }
    }

    pub fn close_playlist_detail(&mut self) {
        if self.prompts.close_playlist_detail() {
            self.publish();
        }
    }

    /// Ask for confirmation before a deletion
    pub fn open_delete_confirmation(&mut self, request: DeleteRequest) {
        if self.prompts.open_delete_confirmation(request) {
            self.publish();
        }
    }

    /// Dismiss the confirmation without deleting anything
    pub fn close_delete_confirmation(&mut self) {
        if self.prompts.close_delete_confirmation() {
            self.publish();
        }
    }

    /// Run the pending deletion and close the confirmation
    ///
    /// Returns false if no confirmation was open.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(request) = self.prompts.take_delete_confirmation() else {
            return false;
        };

        match request {
            DeleteRequest::Playlist { playlist } => {
                self.delete_playlist(&playlist.id).await;
            }
            DeleteRequest::Song { song, playlist_id } => {
                self.remove_song_from_playlist(&song.id, &playlist_id).await;
            }
        }

        self.publish();
        true
    }

    // ===== Internal =====

    /// Songs in the active navigation order
    fn playback_order(&self) -> Vec<Song> {
        match &self.session.current_playlist {
            Some(playlist) => self.catalog.resolve(&playlist.song_ids),
            None => self.catalog.songs().to_vec(),
        }
    }

    fn is_playing_from(&self, song_id: &SongId, playlist_id: &PlaylistId) -> bool {
        self.session
            .current_song
            .as_ref()
            .is_some_and(|song| &song.id == song_id)
            && self
                .session
                .current_playlist
                .as_ref()
                .is_some_and(|playlist| &playlist.id == playlist_id)
    }

    fn insert_song(&mut self, song_id: &SongId, playlist_id: &PlaylistId) -> bool {
        let Some(playlist) = self.playlists.iter_mut().find(|p| &p.id == playlist_id) else {
            debug!(playlist_id = %playlist_id, "Unknown playlist");
            return false;
        };
        if !playlist.insert_song(song_id.clone()) {
            debug!(song_id = %song_id, playlist_id = %playlist_id, "Song already in playlist");
            return false;
        }

        info!(song_id = %song_id, playlist_id = %playlist_id, "Added song to playlist");
        self.sync
            .update_membership(playlist.id.clone(), playlist.song_ids.clone());
        true
    }

    /// Move one step through the active order, keeping the context
    async fn navigate(&mut self, direction: Direction) {
        let Some(current) = self.session.current_song.as_ref() else {
            debug!(?direction, "Navigation ignored, no current song");
            return;
        };

        let order = self.playback_order();
        let Some(target) = navigation::neighbor(&order, &current.id, direction).cloned() else {
            debug!(?direction, "Navigation ignored, nothing to play");
            return;
        };

        debug!(?direction, song_id = %target.id, "Navigating");
        self.load_and_play(target).await;
    }

    /// Release the live resource, then load and start `song`
    async fn load_and_play(&mut self, song: Song) {
        self.release_sound().await;
        let generation = self.generation;
        self.session.begin_loading(song.clone());

        let Some(uri) = song.uri.as_deref().filter(|uri| !uri.trim().is_empty()) else {
            self.fail_load(&LoadError::MissingUri(song.id.clone()));
            return;
        };

        let sink = StatusSink::new(generation, self.status_tx.clone());
        match self.engine.load(uri, sink).await {
            Ok(mut sound) => {
                self.session.is_loaded = true;
                match sound.play().await {
                    Ok(()) => {
                        self.session.is_playing = true;
                        self.session.phase = PlaybackPhase::Playing;
                    }
                    Err(e) => {
                        self.session.phase = PlaybackPhase::Paused;
                        self.record_transport_error("play", &e);
                    }
                }
                self.sound = Some(sound);
            }
            Err(e) => self.fail_load(&e),
        }
    }

    /// Release the live resource; status from it becomes stale
    async fn release_sound(&mut self) {
        self.generation += 1;
        if let Some(mut sound) = self.sound.take() {
            if let Err(e) = sound.unload().await {
                warn!(error = %e, "Failed to unload previous resource");
            }
        }
        self.session.is_loaded = false;
        self.session.is_playing = false;
        self.session.is_buffering = false;
    }

    async fn stop_playback(&mut self) {
        if self.session.is_playing {
            if let Some(sound) = self.sound.as_mut() {
                if let Err(e) = sound.pause().await {
                    debug!(error = %e, "Pause before stop failed");
                }
            }
        }
        self.release_sound().await;
        self.session.clear();
        self.prompts.set_now_playing(false);
    }

    fn fail_load(&mut self, error: &LoadError) {
        warn!(
            song_id = ?self.session.current_song.as_ref().map(|s| s.id.as_str()),
            error = %error,
            "Failed to load song"
        );
        self.session.last_error = Some(error.to_string());
        self.session.is_loaded = false;
        self.session.is_playing = false;
        self.session.phase = PlaybackPhase::Idle;
    }

    fn record_transport_error(&mut self, action: &str, error: &PlaybackError) {
        warn!(action, error = %error, "Playback command failed");
        self.session.last_error = Some(error.to_string());
    }
}
