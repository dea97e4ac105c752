//! # termtris-scores
//!
//! Shared high-score storage for the termtris terminal game.
//!
//! Several game processes may run at once against the same score file. Every
//! write is a short read-modify-write cycle under an exclusive advisory lock,
//! and every query reads under a shared lock. Nothing is cached between calls.
//!
//! - **Codec**: one line per record, `name score/lines/level`, malformed lines skipped
//! - **Leaderboard**: bounded, descending, stable merge-insert
//! - **Storage**: text file or a fixed-slot table embedded in a host file
//! - **Scoreboard**: `record` and `top` over a chosen store
//!
//! ## Example
//!
//! ```no_run
//! use termtris_scores::{ScoreConfig, Scoreboard, account_name};
//!
//! let config = ScoreConfig::load_or_default(None)?;
//! let board = Scoreboard::new(config.open_store()?);
//! board.record(1200, 34, 3, &account_name())?;
//! for entry in board.top(10)? {
//!     println!("{} {}", entry.user, entry.score);
//! }
//! # Ok::<(), termtris_scores::Error>(())
//! ```

pub mod codec;
pub mod config;
pub mod entry;
pub mod error;
pub mod identity;
pub mod leaderboard;
pub mod scoreboard;
pub mod storage;

pub use codec::{MAX_LINE_LEN, MalformedLine, decode, encode};
pub use config::{ScoreConfig, ScoreConfigBuilder, StoreKind};
pub use entry::{DEFAULT_USER, MAX_NAME_LEN, ScoreEntry, UserName, sanitize_name};
pub use error::{Error, Result};
pub use identity::{account_name, account_name_from};
pub use leaderboard::{Leaderboard, merge_insert};
pub use scoreboard::{RecordOutcome, Scoreboard};
pub use storage::{EmbeddedStore, MAX_CAPACITY, ScoreStore, StoreBackend, TextFileStore};
