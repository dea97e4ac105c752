//! Single-line text encoding of score entries.
//!
//! A record is `<name><whitespace><score>/<lines>/<level>` followed by a line
//! break. Decoding is tolerant: anything that does not match is reported as a
//! [`MalformedLine`] and skipped by the stores rather than failing the read.
//!
//! Names are opaque bytes. Only the numeric fields must be ASCII.

use thiserror::Error;

use crate::entry::{ScoreEntry, UserName};

/// Longest line the stores will read, including the line break
pub const MAX_LINE_LEN: usize = 256;

/// Reason a line was rejected by [`decode`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedLine {
    #[error("blank line")]
    Blank,

    #[error("name without score fields")]
    MissingFields,

    #[error("score fields do not match score/lines/level: {0:?}")]
    BadFields(String),

    #[error("line longer than {} bytes", MAX_LINE_LEN)]
    TooLong,
}

/// Encode an entry as one line, including the trailing newline
pub fn encode(entry: &ScoreEntry) -> Vec<u8> {
    let mut line = Vec::with_capacity(entry.user.len() + 24);
    line.extend_from_slice(entry.user.as_bytes());
    let fields = format!(" {}/{}/{}\n", entry.score, entry.lines, entry.level);
    line.extend_from_slice(fields.as_bytes());
    line
}

/// Decode one line (with or without its line break)
pub fn decode<L: AsRef<[u8]>>(line: L) -> Result<ScoreEntry, MalformedLine> {
    let line = trim_start(line.as_ref());
    if line.is_empty() {
        return Err(MalformedLine::Blank);
    }

    let split = line
        .iter()
        .position(|&b| is_space(b))
        .ok_or(MalformedLine::MissingFields)?;
    let (user, rest) = line.split_at(split);
    let fields = trim_end(trim_start(rest));
    if fields.is_empty() {
        return Err(MalformedLine::MissingFields);
    }

    let bad_fields =
        || MalformedLine::BadFields(String::from_utf8_lossy(fields).into_owned());

    let mut parts = fields.split(|&b| b == b'/');
    let (Some(score), Some(lines), Some(level), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(bad_fields());
    };

    Ok(ScoreEntry {
        user: UserName::from_bytes(user),
        score: parse_decimal(score).ok_or_else(bad_fields)?,
        lines: parse_decimal(lines).ok_or_else(bad_fields)?,
        level: parse_decimal(level).ok_or_else(bad_fields)?,
    })
}

/// Whitespace as classified by C `isspace` in the "C" locale
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn trim_start(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&b| !is_space(b))
        .unwrap_or(bytes.len());
    &bytes[start..]
}

fn trim_end(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| !is_space(b))
        .map_or(0, |i| i + 1);
    &bytes[..end]
}

fn parse_decimal(digits: &[u8]) -> Option<u64> {
    // u64::from_str accepts a leading '+', the format does not
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}
