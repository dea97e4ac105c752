//! Command-line arguments.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use termtris_scores::{ScoreConfig, StoreKind};

#[derive(Parser)]
#[command(name = "termtris-scores")]
#[command(version, about = "termtris high score table")]
pub struct Cli {
    /// Print the top 10 scores and exit
    #[arg(short = 's', long = "scores")]
    pub scores: bool,

    /// Config file (default: <config dir>/termtris/scores.toml)
    #[arg(long, global = true, env = "TERMTRIS_SCORES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Score file, or host file for the embedded table
    #[arg(short, long, global = true, env = "TERMTRIS_SCORES_FILE")]
    pub file: Option<PathBuf>,

    /// Storage backend (text, embedded)
    #[arg(long, global = true)]
    pub backend: Option<StoreKind>,

    /// Maximum number of entries kept
    #[arg(long, global = true)]
    pub capacity: Option<usize>,

    /// Byte offset of the embedded table (decimal or 0x-prefixed hex)
    #[arg(long, global = true, value_parser = parse_offset)]
    pub offset: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the top scores
    List {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Print JSON instead of the text table
        #[arg(long)]
        json: bool,
    },

    /// Record a finished game
    Record {
        #[arg(long)]
        score: u64,

        #[arg(long, default_value_t = 0)]
        lines: u64,

        #[arg(long, default_value_t = 0)]
        level: u64,

        /// Display name (default: account name)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show the rank a score would reach without recording it
    Check {
        #[arg(long)]
        score: u64,
    },
}

impl Cli {
    /// Resolve the engine configuration: flags over config file over defaults
    pub fn score_config(&self) -> Result<ScoreConfig> {
        let mut config = ScoreConfig::load_or_default(self.config.as_deref())?;
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(ref file) = self.file {
            config.path = file.clone();
        }
        if let Some(capacity) = self.capacity {
            config.capacity = Some(capacity);
        }
        if let Some(offset) = self.offset {
            config.offset = offset;
        }
        Ok(config)
    }
}

/// Parse an offset given as decimal or as hex with a 0x prefix
pub fn parse_offset(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("Invalid offset {:?}: {}", s, e))
}
