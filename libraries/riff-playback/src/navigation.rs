//! Next / previous song selection
//!
//! Navigation is always relative to an ordered song list (the active playlist
//! context resolved against the catalog, or the catalog itself). Both
//! directions wrap around.

use riff_core::{Song, SongId};

/// Navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the end of the order
    Next,

    /// Towards the start of the order
    Previous,
}

/// Index of `current` in `order`
///
/// A song that is not in the order counts as index 0, so navigating from it
/// still lands somewhere predictable.
pub fn current_index(order: &[Song], current: &SongId) -> usize {
    order
        .iter()
        .position(|song| &song.id == current)
        .unwrap_or(0)
}

/// Step `index` one place in `direction` over a list of `len` songs
///
/// Returns `None` for an empty list.
pub fn step(len: usize, index: usize, direction: Direction) -> Option<usize> {
    if len == 0 {
        return None;
    }

    let index = index % len;
    Some(match direction {
        Direction::Next => (index + 1) % len,
        Direction::Previous => (index + len - 1) % len,
    })
}

/// Song after (or before) `current` in `order`
pub fn neighbor<'a>(order: &'a [Song], current: &SongId, direction: Direction) -> Option<&'a Song> {
    let index = current_index(order, current);
    step(order.len(), index, direction).map(|target| &order[target])
}
