//! Record command: merge one finished game into the leaderboard.

use anyhow::{Context, Result};
use termtris_scores::{RecordOutcome, ScoreEntry, ScoreStore, Scoreboard, account_name};

/// Record a score, using the account name when no user is given
pub fn run<S: ScoreStore>(
    board: &Scoreboard<S>,
    score: u64,
    lines: u64,
    level: u64,
    user: Option<&str>,
) -> Result<RecordOutcome> {
    let user = match user {
        Some(name) => name.to_string(),
        None => account_name(),
    };
    let entry = ScoreEntry::new(&user, score, lines, level);
    let message_entry = entry.clone();

    let outcome = board.record_entry(entry).with_context(|| {
        format!(
            "score was not saved to {}",
            board.store().path().display()
        )
    })?;

    println!("{}", confirmation(&message_entry, outcome));
    Ok(outcome)
}

/// Confirmation line, naming the entry as it was stored
pub fn confirmation(entry: &ScoreEntry, outcome: RecordOutcome) -> String {
    match outcome {
        RecordOutcome::Ranked(rank) => {
            format!("{}: {} pts, rank {}", entry.user, entry.score, rank)
        }
        RecordOutcome::NotRanked => {
            format!("{}: {} pts did not make the table", entry.user, entry.score)
        }
    }
}
