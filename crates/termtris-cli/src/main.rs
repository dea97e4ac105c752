use anyhow::Result;
use clap::Parser;
use termtris_scores::Scoreboard;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Command};

fn main() -> Result<()> {
    // Logs go to stderr so listings stay clean on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("termtris_scores=info".parse()?),
        )
        .init();

    let args = Cli::parse();
    let config = args.score_config()?;
    debug!("Resolved config: {:?}", config);

    let board = Scoreboard::new(config.open_store()?);

    if args.scores {
        return commands::list::run(&board, 10, false);
    }

    match args.command {
        Some(Command::List { count, json }) => commands::list::run(&board, count, json),
        Some(Command::Record {
            score,
            lines,
            level,
            user,
        }) => commands::record::run(&board, score, lines, level, user.as_deref()).map(|_| ()),
        Some(Command::Check { score }) => commands::check::run(&board, score).map(|_| ()),
        None => commands::list::run(&board, 10, false),
    }
}
