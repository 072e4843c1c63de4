//! Property-based tests for navigation and the coordinator
//!
//! Uses proptest to verify invariants across many random inputs.

mod common;

use common::{song, Harness};
use proptest::prelude::*;
use riff_core::{AudioStatus, PlaylistId, Song, SongId};
use riff_playback::navigation::{neighbor, step, Direction};

fn songs(len: usize) -> Vec<Song> {
    (0..len)
        .map(|i| Song::new(i.to_string(), format!("Song {i}"), "Artist"))
        .collect()
}

#[derive(Debug, Clone)]
enum Op {
    Play(usize),
    PlayRoad,
    Shuffle,
    Next,
    Previous,
    Toggle,
    Seek(u64),
    Stop,
    Finish,
    StaleFinish,
    RemovePlaying,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..5).prop_map(Op::Play),
        Just(Op::PlayRoad),
        Just(Op::Shuffle),
        Just(Op::Next),
        Just(Op::Previous),
        Just(Op::Toggle),
        (0u64..300_000).prop_map(Op::Seek),
        Just(Op::Stop),
        Just(Op::Finish),
        Just(Op::StaleFinish),
        Just(Op::RemovePlaying),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    /// Property: next then previous returns to the starting index
    #[test]
    fn next_then_previous_round_trips(len in 1usize..100, index in 0usize..100) {
        let index = index % len;
        let next = step(len, index, Direction::Next).unwrap();
        prop_assert!(next < len);
        prop_assert_eq!(step(len, next, Direction::Previous), Some(index));
    }

    /// Property: len steps forward visit every song once and come back
    #[test]
    fn forward_cycle_visits_every_song(len in 1usize..40, start in 0usize..40) {
        let order = songs(len);
        let mut current = order[start % len].id.clone();
        let mut seen = std::collections::HashSet::new();

        for _ in 0..len {
            seen.insert(current.clone());
            current = neighbor(&order, &current, Direction::Next).unwrap().id.clone();
        }

        prop_assert_eq!(seen.len(), len);
        prop_assert_eq!(current, order[start % len].id.clone());
    }

    /// Property: whatever happens, at most one resource is ever live
    #[test]
    fn at_most_one_live_resource(ops in prop::collection::vec(arbitrary_op(), 1..40)) {
        runtime().block_on(async {
            let mut h = Harness::new().await;
            let catalog = common::catalog();
            let mut stale = None;

            for op in ops {
                match op {
                    Op::Play(i) => {
                        if let Some(sink) = h.engine.try_last_sink() {
                            stale = Some(sink);
                        }
                        h.player.play_song(catalog.songs()[i].clone()).await;
                    }
                    Op::PlayRoad => {
                        let road = h.player.playlist(&PlaylistId::new("road")).cloned();
                        if let Some(road) = road {
                            h.player.play_playlist(road).await;
                        }
                    }
                    Op::Shuffle => {
                        let all = common::playlist("all", "All", &["a", "b", "c", "d", "e"]);
                        h.player.shuffle_playlist(all).await;
                    }
                    Op::Next => h.player.play_next_song().await,
                    Op::Previous => h.player.play_previous_song().await,
                    Op::Toggle => h.player.toggle_play_pause().await,
                    Op::Seek(position) => h.player.seek_to_position(position).await,
                    Op::Stop => h.player.stop().await,
                    Op::Finish => {
                        if h.player.session().is_loaded {
                            h.engine.last_sink().report(AudioStatus::finished(200_000));
                        }
                    }
                    Op::StaleFinish => {
                        if let Some(sink) = &stale {
                            sink.report(AudioStatus::finished(200_000));
                        }
                    }
                    Op::RemovePlaying => {
                        let target = h
                            .player
                            .current_song()
                            .map(|s| s.id.clone())
                            .zip(h.player.current_playlist().map(|p| p.id.clone()));
                        if let Some((song_id, playlist_id)) = target {
                            h.player.remove_song_from_playlist(&song_id, &playlist_id).await;
                        }
                    }
                }
                h.player.drain_status().await;

                assert!(h.engine.live() <= 1);
                if h.player.session().is_loaded {
                    assert_eq!(h.engine.live(), 1);
                }
            }

            assert!(h.engine.max_live() <= 1);
        });
    }

    /// Property: adding a song twice leaves one copy
    #[test]
    fn add_song_is_idempotent(ids in prop::collection::vec(0usize..5, 1..20)) {
        runtime().block_on(async {
            let mut h = Harness::new().await;
            let empty = PlaylistId::new("empty");

            for i in &ids {
                let id = SongId::new(["a", "b", "c", "d", "e"][*i]);
                h.player.add_song_to_playlist(&id, &empty);
                h.player.add_song_to_playlist(&id, &empty);
            }

            let playlist = h.player.playlist(&empty).cloned().unwrap();
            let unique: std::collections::HashSet<_> = playlist.song_ids.iter().collect();
            assert_eq!(unique.len(), playlist.song_ids.len());

            h.player.flush_sync().await;
            assert_eq!(h.store.stored("empty").unwrap().song_ids, playlist.song_ids);
        });
    }
}

#[tokio::test]
async fn finish_on_every_song_cycles_catalog() {
    let mut h = Harness::new().await;
    h.player.play_song(song("a")).await;

    for expected in ["b", "c", "d", "e", "a"] {
        h.engine.last_sink().report(AudioStatus::finished(1_000));
        h.player.drain_status().await;
        assert_eq!(h.current_id().as_deref(), Some(expected));
    }
}
