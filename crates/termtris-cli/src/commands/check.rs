//! Check command: report the rank a score would reach.

use anyhow::{Context, Result};
use termtris_scores::{ScoreStore, Scoreboard};

pub fn run<S: ScoreStore>(board: &Scoreboard<S>, score: u64) -> Result<Option<usize>> {
    let rank = board
        .qualifies(score)
        .with_context(|| {
            format!(
                "Failed to read scores from {}",
                board.store().path().display()
            )
        })?;

    match rank {
        Some(rank) => println!("{} pts would rank {}", score, rank),
        None => println!("{} pts does not qualify", score),
    }
    Ok(rank)
}
