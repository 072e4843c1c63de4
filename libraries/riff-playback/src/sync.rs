//! Background playlist sync
//!
//! Playlist edits are applied to the in-memory collection first and pushed to
//! the store afterwards. A single worker task drains the job queue so writes
//! for a playlist reach the store in the order they were made. Failures are
//! logged and counted, never rolled back.

use riff_core::{PlaylistId, PlaylistStore, SongId};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

enum SyncJob {
    Membership {
        playlist_id: PlaylistId,
        song_ids: Vec<SongId>,
    },
    Delete {
        playlist_id: PlaylistId,
    },
    Flush(oneshot::Sender<()>),
}

/// Counters for finished sync jobs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub succeeded: u64,
    pub failed: u64,
}

#[derive(Default)]
struct Counters {
    succeeded: AtomicU64,
    failed: AtomicU64,
}

/// Handle to the sync worker task
///
/// The worker exits once this handle is dropped and the queue is drained.
pub(crate) struct SyncWorker {
    tx: mpsc::UnboundedSender<SyncJob>,
    counters: Arc<Counters>,
}

impl SyncWorker {
    /// Spawn the worker on the current Tokio runtime
    pub(crate) fn spawn(store: Arc<dyn PlaylistStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let counters = Arc::new(Counters::default());
        tokio::spawn(run_worker(store, rx, Arc::clone(&counters)));

        Self { tx, counters }
    }

    pub(crate) fn update_membership(&self, playlist_id: PlaylistId, song_ids: Vec<SongId>) {
        self.submit(SyncJob::Membership {
            playlist_id,
            song_ids,
        });
    }

    pub(crate) fn delete(&self, playlist_id: PlaylistId) {
        self.submit(SyncJob::Delete { playlist_id });
    }

    /// Wait until every job queued so far has finished
    pub(crate) async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(SyncJob::Flush(done_tx)).is_err() {
            return;
        }
        if done_rx.await.is_err() {
            warn!("Sync worker stopped before flush completed");
        }
    }

    pub(crate) fn stats(&self) -> SyncStats {
        SyncStats {
            succeeded: self.counters.succeeded.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    fn submit(&self, job: SyncJob) {
        if self.tx.send(job).is_err() {
            warn!("Sync worker is gone, dropping playlist change");
        }
    }
}

async fn run_worker(
    store: Arc<dyn PlaylistStore>,
    mut rx: mpsc::UnboundedReceiver<SyncJob>,
    counters: Arc<Counters>,
) {
    while let Some(job) = rx.recv().await {
        let (playlist_id, result) = match job {
            SyncJob::Membership {
                playlist_id,
                song_ids,
            } => {
                debug!(
                    playlist_id = %playlist_id,
                    songs = song_ids.len(),
                    "Syncing playlist membership"
                );
                let result = store.update_membership(&playlist_id, &song_ids).await;
                (playlist_id, result)
            }
            SyncJob::Delete { playlist_id } => {
                debug!(playlist_id = %playlist_id, "Syncing playlist deletion");
                let result = store.delete(&playlist_id).await;
                (playlist_id, result)
            }
            SyncJob::Flush(done) => {
                let _ = done.send(());
                continue;
            }
        };

        match result {
            Ok(()) => {
                counters.succeeded.fetch_add(1, Ordering::Relaxed);
            }
            Err(error) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                warn!(playlist_id = %playlist_id, error = %error, "Playlist sync failed");
            }
        }
    }

    debug!("Sync worker stopped");
}
