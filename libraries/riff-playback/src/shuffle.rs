//! Playlist shuffling
//!
//! Shuffling builds a transient playlist context with the same id and name as
//! the source playlist and its songs in random order. The shuffled order lives
//! only in the playback session and is never written back to the store.

use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use riff_core::{Catalog, Playlist, Song};

/// Shuffled playback context for `playlist`
///
/// Returns the context and its songs in play order, or `None` when none of the
/// playlist's songs resolve against the catalog.
pub fn shuffled_context(catalog: &Catalog, playlist: &Playlist) -> Option<(Playlist, Vec<Song>)> {
    shuffled_context_with(catalog, playlist, &mut thread_rng())
}

/// [`shuffled_context`] with an explicit random source
pub fn shuffled_context_with<R: Rng + ?Sized>(
    catalog: &Catalog,
    playlist: &Playlist,
    rng: &mut R,
) -> Option<(Playlist, Vec<Song>)> {
    let mut songs = catalog.resolve(&playlist.song_ids);
    if songs.is_empty() {
        return None;
    }

    // Fisher-Yates
    songs.shuffle(rng);

    let context = Playlist {
        id: playlist.id.clone(),
        name: playlist.name.clone(),
        song_ids: songs.iter().map(|song| song.id.clone()).collect(),
    };

    Some((context, songs))
}
