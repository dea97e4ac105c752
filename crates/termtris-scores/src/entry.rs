use std::borrow::Cow;
use std::fmt;

/// Longest stored name in bytes (the fixed-slot table reserves one more for NUL)
pub const MAX_NAME_LEN: usize = 35;

/// Name used when nothing usable is supplied
pub const DEFAULT_USER: &str = "player";

/// Display name as stored on disk.
///
/// Names read back from a score file are kept byte for byte, whether or not
/// they are valid UTF-8, so a rewrite never alters or drops them.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct UserName(Vec<u8>);

impl UserName {
    pub fn from_bytes<B: Into<Vec<u8>>>(bytes: B) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name for display, with invalid UTF-8 replaced
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

impl From<&str> for UserName {
    fn from(name: &str) -> Self {
        Self(name.as_bytes().to_vec())
    }
}

impl From<String> for UserName {
    fn from(name: String) -> Self {
        Self(name.into_bytes())
    }
}

impl PartialEq<str> for UserName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for UserName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

/// A single leaderboard row
///
/// Only `score` determines rank; `lines` and `level` are informational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub user: UserName,
    pub score: u64,
    pub lines: u64,
    pub level: u64,
}

impl ScoreEntry {
    /// Create an entry, sanitizing the display name so it encodes as one token
    pub fn new(user: &str, score: u64, lines: u64, level: u64) -> Self {
        Self {
            user: sanitize_name(user).into(),
            score,
            lines,
            level,
        }
    }
}

/// Make a display name safe for the line format.
///
/// Whitespace becomes `_`, control characters are dropped and the result is
/// cut to [`MAX_NAME_LEN`] bytes on a char boundary. An empty result falls
/// back to [`DEFAULT_USER`].
pub fn sanitize_name(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len().min(MAX_NAME_LEN));
    for c in raw.trim().chars() {
        let c = if c.is_whitespace() { '_' } else { c };
        if c.is_control() {
            continue;
        }
        if name.len() + c.len_utf8() > MAX_NAME_LEN {
            break;
        }
        name.push(c);
    }

    if name.is_empty() {
        DEFAULT_USER.to_string()
    } else {
        name
    }
}
