//! Song catalog
//!
//! The catalog is supplied once at startup and never mutated by the player.
//! Its order is the "global" playback order used when no playlist context is
//! active.

use crate::types::{Song, SongId};
use serde::{Deserialize, Serialize};

/// Ordered, read-only song collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    songs: Vec<Song>,
}

impl Catalog {
    /// Create a catalog from songs in display order
    pub fn new(songs: Vec<Song>) -> Self {
        Self { songs }
    }

    /// All songs in catalog order
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Look up a song by id
    pub fn get(&self, id: &SongId) -> Option<&Song> {
        self.songs.iter().find(|song| &song.id == id)
    }

    /// Resolve ids to songs, in order
    ///
    /// Ids that are not in the catalog are dropped.
    pub fn resolve(&self, ids: &[SongId]) -> Vec<Song> {
        ids.iter().filter_map(|id| self.get(id)).cloned().collect()
    }

    /// Number of songs
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// The bundled SoundHelix demo catalog
    pub fn demo() -> Self {
        const DURATIONS: [&str; 16] = [
            "5:55", "5:37", "5:02", "5:23", "5:18", "5:41", "5:29", "5:47", "5:33", "5:51",
            "5:30", "5:45", "5:20", "5:38", "5:42", "5:28",
        ];

        let songs = DURATIONS
            .iter()
            .enumerate()
            .map(|(i, duration)| {
                let n = i + 1;
                Song::new(n.to_string(), format!("SoundHelix Song {}", n), "SoundHelix")
                    .with_duration(*duration)
                    .with_uri(format!(
                        "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-{}.mp3",
                        n
                    ))
            })
            .collect();

        Self::new(songs)
    }
}

impl From<Vec<Song>> for Catalog {
    fn from(songs: Vec<Song>) -> Self {
        Self::new(songs)
    }
}
