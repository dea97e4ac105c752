//! Fixed-slot score table stored inside a host file.
//!
//! Slot layout (48 bytes):
//!
//! | bytes   | field                       |
//! |---------|-----------------------------|
//! | 0..36   | name, NUL padded            |
//! | 36..40  | score (u32 LE)              |
//! | 40..44  | lines (u32 LE)              |
//! | 44..48  | level (u32 LE)              |
//!
//! An empty name marks the end of the table. The host file is never created,
//! grown past the table or truncated.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::lock::FileLock;
use super::{MAX_CAPACITY, ScoreStore};
use crate::entry::{MAX_NAME_LEN, ScoreEntry, UserName};
use crate::error::{Error, Result};
use crate::leaderboard::Leaderboard;

/// Default number of slots in the embedded table
pub const EMBEDDED_CAPACITY: usize = 10;

/// Bytes reserved for a name including its terminator
pub const SLOT_NAME_LEN: usize = MAX_NAME_LEN + 1;

/// Size of a single slot
pub const SLOT_SIZE: usize = SLOT_NAME_LEN + 3 * 4;

/// Score table at a fixed offset inside an existing file
#[derive(Debug, Clone)]
pub struct EmbeddedStore {
    path: PathBuf,
    offset: u64,
    capacity: usize,
}

impl EmbeddedStore {
    pub fn new<P: Into<PathBuf>>(path: P, offset: u64, capacity: usize) -> Self {
        Self {
            path: path.into(),
            offset,
            capacity,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Size of the whole table in bytes
    fn table_len(&self) -> Result<usize> {
        if self.capacity > MAX_CAPACITY {
            return Err(Error::InvalidConfig(format!(
                "embedded table capacity {} exceeds {}",
                self.capacity, MAX_CAPACITY
            )));
        }
        self.capacity.checked_mul(SLOT_SIZE).ok_or_else(|| {
            Error::InvalidConfig(format!("embedded table of {} slots overflows", self.capacity))
        })
    }

    /// Read the raw table; a short host file yields a short buffer
    fn read_table(&self, mut file: &File, table_len: usize) -> Result<Vec<u8>> {
        let mut table = Vec::new();
        file.seek(SeekFrom::Start(self.offset))?;
        file.take(table_len as u64).read_to_end(&mut table)?;
        Ok(table)
    }
}

impl ScoreStore for EmbeddedStore {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn read_top(&self, limit: usize) -> Result<Vec<ScoreEntry>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No score table at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let table_len = self.table_len()?;
        let _lock = FileLock::shared(&file, &self.path)?;
        let table = self.read_table(&file, table_len)?;
        Ok(decode_table(&table, limit))
    }

    fn modify<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Leaderboard) -> R,
    {
        let table_len = self.table_len()?;
        let file = OpenOptions::new().read(true).write(true).open(&self.path)?;
        let _lock = FileLock::exclusive(&file, &self.path)?;

        let table = self.read_table(&file, table_len)?;
        let existing = decode_table(&table, self.capacity);
        debug!(
            "Loaded {} slots from {} at offset {:#x}",
            existing.len(),
            self.path.display(),
            self.offset
        );

        let mut board = Leaderboard::from_entries(existing, self.capacity);
        let result = f(&mut board);

        let encoded = encode_table(board.entries(), table_len);
        let mut handle = &file;
        handle.seek(SeekFrom::Start(self.offset))?;
        handle.write_all(&encoded)?;
        handle.flush()?;
        file.sync_data()?;

        Ok(result)
    }
}

fn decode_table(table: &[u8], limit: usize) -> Vec<ScoreEntry> {
    table
        .chunks_exact(SLOT_SIZE)
        .take_while(|slot| slot[0] != 0)
        .take(limit)
        .map(decode_slot)
        .collect()
}

fn decode_slot(slot: &[u8]) -> ScoreEntry {
    let name = &slot[..SLOT_NAME_LEN];
    let end = name.iter().position(|&b| b == 0).unwrap_or(SLOT_NAME_LEN);

    ScoreEntry {
        user: UserName::from_bytes(&name[..end]),
        score: read_u32(slot, SLOT_NAME_LEN).into(),
        lines: read_u32(slot, SLOT_NAME_LEN + 4).into(),
        level: read_u32(slot, SLOT_NAME_LEN + 8).into(),
    }
}

fn encode_table(entries: &[ScoreEntry], table_len: usize) -> Vec<u8> {
    let mut table = vec![0u8; table_len];
    for (entry, slot) in entries.iter().zip(table.chunks_exact_mut(SLOT_SIZE)) {
        let name = truncate_name(entry.user.as_bytes());
        slot[..name.len()].copy_from_slice(name);
        write_u32(slot, SLOT_NAME_LEN, entry.score);
        write_u32(slot, SLOT_NAME_LEN + 4, entry.lines);
        write_u32(slot, SLOT_NAME_LEN + 8, entry.level);
    }
    table
}

/// Longest prefix of `name` that fits a slot, without splitting a UTF-8 char
fn truncate_name(name: &[u8]) -> &[u8] {
    if name.len() <= MAX_NAME_LEN {
        return name;
    }
    let Ok(text) = std::str::from_utf8(name) else {
        return &name[..MAX_NAME_LEN];
    };
    let mut end = MAX_NAME_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

fn read_u32(slot: &[u8], at: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&slot[at..at + 4]);
    u32::from_le_bytes(bytes)
}

fn write_u32(slot: &mut [u8], at: usize, value: u64) {
    let value = u32::try_from(value).unwrap_or(u32::MAX);
    slot[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    const HEADER: usize = 256;

    fn host_file(len: usize) -> NamedTempFile {
        let temp = NamedTempFile::new().unwrap();
        let mut content = vec![0xAAu8; len];
        // Table region starts zeroed, like the static array in the image
        let end = (HEADER + EMBEDDED_CAPACITY * SLOT_SIZE).min(len);
        content[HEADER..end].fill(0);
        fs::write(temp.path(), content).unwrap();
        temp
    }

    fn entry(user: &str, score: u64) -> ScoreEntry {
        ScoreEntry::new(user, score, 1, 2)
    }

    #[test]
    fn test_slot_size() {
        assert_eq!(SLOT_SIZE, 48);
    }

    #[test]
    fn test_empty_table_reads_empty() {
        let host = host_file(1024);
        let store = EmbeddedStore::new(host.path(), HEADER as u64, EMBEDDED_CAPACITY);
        assert!(store.read_top(10).unwrap().is_empty());
    }

    #[test]
    fn test_modify_preserves_surrounding_bytes() {
        let host = host_file(1024);
        let store = EmbeddedStore::new(host.path(), HEADER as u64, EMBEDDED_CAPACITY);

        store.modify(|board| board.merge_insert(entry("alice", 300))).unwrap();
        store.modify(|board| board.merge_insert(entry("bob", 500))).unwrap();

        let content = fs::read(host.path()).unwrap();
        assert_eq!(content.len(), 1024);
        assert!(content[..HEADER].iter().all(|&b| b == 0xAA));
        assert!(content[HEADER + EMBEDDED_CAPACITY * SLOT_SIZE..]
            .iter()
            .all(|&b| b == 0xAA));

        let top = store.read_top(10).unwrap();
        let users: Vec<String> = top.iter().map(|e| e.user.to_string()).collect();
        assert_eq!(users, vec!["bob", "alice"]);
        assert_eq!(top[0].lines, 1);
        assert_eq!(top[0].level, 2);
    }

    #[test]
    fn test_capacity_is_enforced() {
        let host = host_file(1024);
        let store = EmbeddedStore::new(host.path(), HEADER as u64, 2);
        for (user, score) in [("a", 10), ("b", 30), ("c", 20), ("d", 5)] {
            store.modify(|board| board.merge_insert(entry(user, score))).unwrap();
        }
        let scores: Vec<u64> = store.read_top(10).unwrap().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![30, 20]);
    }

    #[test]
    fn test_missing_host_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = EmbeddedStore::new(dir.path().join("termtris.exe"), 0, EMBEDDED_CAPACITY);
        assert!(store.read_top(10).unwrap().is_empty());

        let err = store
            .modify(|board| board.merge_insert(entry("a", 1)))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(!dir.path().join("termtris.exe").exists());
    }

    #[test]
    fn test_short_host_file_reads_as_empty_slots() {
        let host = NamedTempFile::new().unwrap();
        fs::write(host.path(), vec![0u8; 16]).unwrap();
        let store = EmbeddedStore::new(host.path(), 64, EMBEDDED_CAPACITY);
        assert!(store.read_top(10).unwrap().is_empty());
    }

    #[test]
    fn test_values_saturate() {
        let table = encode_table(&[entry("big", u64::MAX)], SLOT_SIZE);
        let decoded = decode_table(&table, 1);
        assert_eq!(decoded[0].score, u64::from(u32::MAX));
    }

    #[test]
    fn test_truncate_name_on_char_boundary() {
        let name = format!("{}é", "x".repeat(34));
        assert_eq!(name.len(), 36);
        assert_eq!(truncate_name(name.as_bytes()), "x".repeat(34).as_bytes());

        let raw = [0xFFu8; 40];
        assert_eq!(truncate_name(&raw).len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_non_utf8_slot_name_is_kept() {
        let mut table = encode_table(&[entry("a", 3), entry("b", 2)], 3 * SLOT_SIZE);
        table[0] = 0xFF;
        let decoded = decode_table(&table, 3);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].user.as_bytes(), &[0xFF]);
        assert_eq!(encode_table(&decoded, 3 * SLOT_SIZE), table);
    }

    #[test]
    fn test_oversized_capacity_is_rejected() {
        let host = host_file(1024);
        let before = fs::read(host.path()).unwrap();
        for capacity in [MAX_CAPACITY + 1, usize::MAX / 8, usize::MAX] {
            let store = EmbeddedStore::new(host.path(), HEADER as u64, capacity);
            assert!(matches!(store.read_top(10), Err(Error::InvalidConfig(_))));
            assert!(matches!(
                store.modify(|board| board.merge_insert(entry("a", 1))),
                Err(Error::InvalidConfig(_))
            ));
        }
        assert_eq!(fs::read(host.path()).unwrap(), before);
    }
}
