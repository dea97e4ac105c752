//! List command: print the top of the leaderboard.

use std::borrow::Cow;
use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use termtris_scores::{ScoreEntry, ScoreStore, Scoreboard};

#[derive(Debug, Serialize)]
struct RankedEntryJson<'a> {
    rank: usize,
    user: Cow<'a, str>,
    score: u64,
    lines: u64,
    level: u64,
}

/// Print the top `count` scores to stdout
pub fn run<S: ScoreStore>(board: &Scoreboard<S>, count: usize, json: bool) -> Result<()> {
    let entries = board
        .top(count)
        .with_context(|| {
            format!(
                "Failed to read scores from {}",
                board.store().path().display()
            )
        })?;

    if entries.is_empty() && !json {
        eprintln!("no high-scores found");
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        writeln!(out, "{}", format_json(&entries)?)?;
    } else {
        write_table(&mut out, &entries)?;
    }
    Ok(())
}

/// Format one leaderboard line (rank is 1-indexed)
pub fn format_entry(rank: usize, entry: &ScoreEntry) -> String {
    format!(
        "{:>2}. {} - {} pts  ({} lines)",
        rank, entry.user, entry.score, entry.lines
    )
}

pub fn write_table<W: Write>(out: &mut W, entries: &[ScoreEntry]) -> Result<()> {
    writeln!(out, "High Scores")?;
    writeln!(out, "-----------")?;
    for (i, entry) in entries.iter().enumerate() {
        writeln!(out, "{}", format_entry(i + 1, entry))?;
    }
    Ok(())
}

pub fn format_json(entries: &[ScoreEntry]) -> Result<String> {
    let ranked: Vec<RankedEntryJson<'_>> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| RankedEntryJson {
            rank: i + 1,
            user: e.user.to_string_lossy(),
            score: e.score,
            lines: e.lines,
            level: e.level,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&ranked)?)
}
