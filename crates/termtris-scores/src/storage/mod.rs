//! Backing stores for the leaderboard.
//!
//! Two providers share the same ordered-store logic:
//!
//! - **Text file**: one record per line, growable, truncated to the written
//!   length on every save
//! - **Embedded table**: a fixed array of binary slots at a known offset
//!   inside a host file (the legacy layout, stored in the game executable)
//!
//! Both take advisory whole-file locks: exclusive for the read-modify-write
//! cycle, shared for queries.

mod embedded;
mod lock;
mod text_file;

pub use embedded::{EMBEDDED_CAPACITY, EmbeddedStore, SLOT_NAME_LEN, SLOT_SIZE};
pub use text_file::{TEXT_CAPACITY, TextFileStore};

use std::path::Path;

/// Upper bound on the capacity of any store
pub const MAX_CAPACITY: usize = 10_000;

use crate::entry::ScoreEntry;
use crate::error::Result;
use crate::leaderboard::Leaderboard;

/// Storage capability behind the durable leaderboard
pub trait ScoreStore {
    /// Maximum number of entries kept by this store
    fn capacity(&self) -> usize;

    /// Location of the backing file
    fn path(&self) -> &Path;

    /// Read up to `limit` leading entries under a shared lock.
    ///
    /// A missing backing file yields an empty list.
    fn read_top(&self, limit: usize) -> Result<Vec<ScoreEntry>>;

    /// Load, mutate and save the leaderboard inside one exclusive critical section
    fn modify<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Leaderboard) -> R;
}

/// Store selected once at startup
#[derive(Debug, Clone)]
pub enum StoreBackend {
    TextFile(TextFileStore),
    Embedded(EmbeddedStore),
}

impl ScoreStore for StoreBackend {
    fn capacity(&self) -> usize {
        match self {
            Self::TextFile(store) => store.capacity(),
            Self::Embedded(store) => store.capacity(),
        }
    }

    fn path(&self) -> &Path {
        match self {
            Self::TextFile(store) => store.path(),
            Self::Embedded(store) => store.path(),
        }
    }

    fn read_top(&self, limit: usize) -> Result<Vec<ScoreEntry>> {
        match self {
            Self::TextFile(store) => store.read_top(limit),
            Self::Embedded(store) => store.read_top(limit),
        }
    }

    fn modify<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Leaderboard) -> R,
    {
        match self {
            Self::TextFile(store) => store.modify(f),
            Self::Embedded(store) => store.modify(f),
        }
    }
}

impl From<TextFileStore> for StoreBackend {
    fn from(store: TextFileStore) -> Self {
        Self::TextFile(store)
    }
}

impl From<EmbeddedStore> for StoreBackend {
    fn from(store: EmbeddedStore) -> Self {
        Self::Embedded(store)
    }
}
