//! Bounded, rank-ordered sequence of score entries.

use crate::entry::ScoreEntry;

/// In-memory leaderboard, sorted descending by score and capped at `capacity`
///
/// Ties keep insertion order: a new entry lands after every existing entry
/// with the same score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
    capacity: usize,
}

impl Leaderboard {
    /// Create an empty leaderboard
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Wrap entries that are already sorted (as written by a previous merge)
    ///
    /// The order is trusted, anything past `capacity` is dropped.
    pub fn from_entries(mut entries: Vec<ScoreEntry>, capacity: usize) -> Self {
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    /// Insert an entry at its sorted position and trim to capacity.
    ///
    /// Returns the 1-indexed rank achieved, or `None` when the entry was cut.
    pub fn merge_insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        let pos = insertion_point(&self.entries, entry.score);
        if pos >= self.capacity {
            return None;
        }
        self.entries.insert(pos, entry);
        self.entries.truncate(self.capacity);
        Some(pos + 1)
    }

    /// Check if a score would make the cut
    pub fn qualifies(&self, score: u64) -> bool {
        insertion_point(&self.entries, score) < self.capacity
    }

    /// Get the rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        let pos = insertion_point(&self.entries, score);
        (pos < self.capacity).then_some(pos + 1)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ScoreEntry> {
        self.entries
    }
}

/// Merge one entry into an already sorted sequence, capped at `capacity`
pub fn merge_insert(
    existing: Vec<ScoreEntry>,
    entry: ScoreEntry,
    capacity: usize,
) -> Vec<ScoreEntry> {
    let mut board = Leaderboard::from_entries(existing, capacity);
    board.merge_insert(entry);
    board.into_entries()
}

/// Length of the prefix whose scores are >= `score`
fn insertion_point(entries: &[ScoreEntry], score: u64) -> usize {
    entries
        .iter()
        .position(|e| e.score < score)
        .unwrap_or(entries.len())
}
