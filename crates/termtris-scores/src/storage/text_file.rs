use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::ScoreStore;
use super::lock::FileLock;
use crate::codec::{self, MAX_LINE_LEN, MalformedLine};
use crate::entry::ScoreEntry;
use crate::error::Result;
use crate::leaderboard::Leaderboard;

/// Default number of entries kept in the text file
pub const TEXT_CAPACITY: usize = 100;

/// Line-per-record score file guarded by advisory locks
#[derive(Debug, Clone)]
pub struct TextFileStore {
    path: PathBuf,
    capacity: usize,
}

impl TextFileStore {
    pub fn new<P: Into<PathBuf>>(path: P, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
        }
    }

    fn open_read_write(&self) -> io::Result<File> {
        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true).truncate(false);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o666);
        }
        options.open(&self.path)
    }
}

impl ScoreStore for TextFileStore {
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
                info!("No scores recorded at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let _lock = FileLock::shared(&file, &self.path)?;
        read_entries(BufReader::new(&file), limit)
    }

    fn modify<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Leaderboard) -> R,
    {
        let file = self.open_read_write()?;
        let _lock = FileLock::exclusive(&file, &self.path)?;

        let existing = read_entries(BufReader::new(&file), self.capacity)?;
        debug!(
            "Loaded {} entries from {}",
            existing.len(),
            self.path.display()
        );

        let mut board = Leaderboard::from_entries(existing, self.capacity);
        let result = f(&mut board);

        write_entries(&file, board.entries())?;
        debug!("Wrote {} entries to {}", board.len(), self.path.display());

        Ok(result)
    }
}

/// Decode up to `limit` well-formed lines, skipping malformed ones
fn read_entries<R: BufRead>(mut reader: R, limit: usize) -> Result<Vec<ScoreEntry>> {
    let mut entries = Vec::new();
    let mut line = Vec::new();
    let mut line_no = 0usize;

    while entries.len() < limit {
        line.clear();
        let decoded = match read_line_capped(&mut reader, &mut line)? {
            None => break,
            Some(LineRead::Complete) => codec::decode(&line),
            Some(LineRead::TooLong) => Err(MalformedLine::TooLong),
        };
        line_no += 1;

        match decoded {
            Ok(entry) => entries.push(entry),
            Err(e) => debug!("Skipping line {}: {}", line_no, e),
        }
    }

    Ok(entries)
}

enum LineRead {
    Complete,
    TooLong,
}

/// Read one line of at most [`MAX_LINE_LEN`] bytes into `line`.
///
/// The rest of an overlong line is consumed without being buffered.
fn read_line_capped<R: BufRead>(
    reader: &mut R,
    line: &mut Vec<u8>,
) -> io::Result<Option<LineRead>> {
    let read = reader
        .by_ref()
        .take(MAX_LINE_LEN as u64)
        .read_until(b'\n', line)?;
    if read == 0 {
        return Ok(None);
    }
    if read < MAX_LINE_LEN || line.last() == Some(&b'\n') {
        return Ok(Some(LineRead::Complete));
    }

    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        match buf.iter().position(|&b| b == b'\n') {
            Some(i) => {
                reader.consume(i + 1);
                break;
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
    Ok(Some(LineRead::TooLong))
}

/// Rewrite the whole file with `entries` and cut it to the written length
fn write_entries(mut file: &File, entries: &[ScoreEntry]) -> Result<()> {
    let content: Vec<u8> = entries.iter().flat_map(codec::encode).collect();

    file.seek(SeekFrom::Start(0))?;
    file.write_all(&content)?;
    file.set_len(content.len() as u64)?;
    file.flush()?;
    file.sync_data()?;
    Ok(())
}
