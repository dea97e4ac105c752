//! Several writers sharing one score file through separate handles.

use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;

use termtris_scores::{Scoreboard, TextFileStore, decode};

const WRITERS: usize = 8;
const GAMES_PER_WRITER: u64 = 12;

#[test]
fn test_concurrent_records_are_not_lost() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores");
    let capacity = WRITERS * GAMES_PER_WRITER as usize;
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let board = Scoreboard::new(TextFileStore::new(path, capacity));
                barrier.wait();
                for game in 0..GAMES_PER_WRITER {
                    let score = game * WRITERS as u64 + writer as u64;
                    board
                        .record(score, game, 1, &format!("writer{}", writer))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let content = fs::read_to_string(&path).unwrap();
    let scores: Vec<u64> = content.lines().map(|l| decode(l).unwrap().score).collect();
    assert_eq!(scores.len(), capacity);
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    let expected: Vec<u64> = (0..capacity as u64).rev().collect();
    assert_eq!(scores, expected);
}

#[test]
fn test_concurrent_records_respect_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores");
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let board = Scoreboard::new(TextFileStore::new(path, 10));
                barrier.wait();
                for game in 0..GAMES_PER_WRITER {
                    board
                        .record(game * 100 + writer as u64, game, 1, "p")
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let board = Scoreboard::new(TextFileStore::new(&path, 10));
    let top = board.top(10).unwrap();
    assert_eq!(top.len(), 10);
    assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    let top_score = (GAMES_PER_WRITER - 1) * 100 + WRITERS as u64 - 1;
    assert_eq!(top[0].score, top_score);
}
