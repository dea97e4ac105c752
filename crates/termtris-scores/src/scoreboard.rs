//! Durable leaderboard: the locked merge-write and the read-only query path.

use tracing::info;

use crate::entry::ScoreEntry;
use crate::error::Result;
use crate::leaderboard::Leaderboard;
use crate::storage::{ScoreStore, StoreBackend};

/// Result of recording a score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The entry was kept at this 1-indexed rank
    Ranked(usize),
    /// The score did not make the cut; the board is unchanged
    NotRanked,
}

/// Leaderboard backed by a shared file.
///
/// Holds no entries itself: every call re-reads the backing store.
#[derive(Debug, Clone)]
pub struct Scoreboard<S = StoreBackend> {
    store: S,
}

impl<S: ScoreStore> Scoreboard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Merge a finished game into the persisted leaderboard.
    ///
    /// Runs the full exclusive read-modify-write cycle even when the score
    /// turns out not to qualify, since the cutoff is only known after reading.
    pub fn record(
        &self,
        score: u64,
        lines: u64,
        level: u64,
        user: &str,
    ) -> Result<RecordOutcome> {
        self.record_entry(ScoreEntry::new(user, score, lines, level))
    }

    /// Merge a prepared entry into the persisted leaderboard
    pub fn record_entry(&self, entry: ScoreEntry) -> Result<RecordOutcome> {
        let user = entry.user.clone();
        let score = entry.score;
        let rank = self.store.modify(|board| board.merge_insert(entry))?;

        let outcome = match rank {
            Some(rank) => {
                info!("Recorded {} pts for {} at rank {}", score, user, rank);
                RecordOutcome::Ranked(rank)
            }
            None => {
                info!(
                    "Score of {} pts for {} did not make the leaderboard",
                    score, user
                );
                RecordOutcome::NotRanked
            }
        };
        Ok(outcome)
    }

    /// Top `n` entries, clamped to the store capacity
    pub fn top(&self, n: usize) -> Result<Vec<ScoreEntry>> {
        self.store.read_top(n.min(self.store.capacity()))
    }

    /// Rank a score would achieve right now, without recording it
    pub fn qualifies(&self, score: u64) -> Result<Option<usize>> {
        let capacity = self.store.capacity();
        let board = Leaderboard::from_entries(self.store.read_top(capacity)?, capacity);
        Ok(board.potential_rank(score))
    }
}
