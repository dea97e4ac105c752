//! Score engine configuration.
//!
//! Values come from, in order of precedence: command-line overrides, a TOML
//! config file, and the built-in defaults below.
//!
//! ```toml
//! backend = "text"
//! path = "/var/games/termtris/scores"
//! capacity = 100
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::storage::{
    EMBEDDED_CAPACITY, EmbeddedStore, MAX_CAPACITY, StoreBackend, TEXT_CAPACITY,
    TextFileStore,
};

/// File name of the score database inside the score directory
pub const SCORE_FILE_NAME: &str = "scores";

/// Config file name under the user config directory
const CONFIG_FILE: &str = "scores.toml";

/// Which storage provider backs the leaderboard
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoreKind {
    /// Growable line-per-record text file
    #[default]
    Text,
    /// Fixed slot table at an offset inside a host file
    Embedded,
}

impl StoreKind {
    /// Capacity used when none is configured
    pub fn default_capacity(self) -> usize {
        match self {
            Self::Text => TEXT_CAPACITY,
            Self::Embedded => EMBEDDED_CAPACITY,
        }
    }
}

/// Configuration for the score engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Storage provider
    pub backend: StoreKind,
    /// Backing file (score file, or host file for the embedded table)
    pub path: PathBuf,
    /// Maximum entries kept, defaults per backend
    pub capacity: Option<usize>,
    /// Byte offset of the embedded table inside the host file
    pub offset: u64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreKind::default(),
            path: default_score_path(),
            capacity: None,
            offset: 0,
        }
    }
}

impl ScoreConfig {
    /// Create a new configuration builder
    pub fn builder() -> ScoreConfigBuilder {
        ScoreConfigBuilder::default()
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: ScoreConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the given config file, or the per-user default one if present.
    ///
    /// An explicit path must load. The default location is optional and
    /// falls back to built-in defaults when missing or unreadable.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let config = Self::load(path)?;
            info!("Loaded config from {}", path.display());
            return Ok(config);
        }

        let Some(path) = Self::default_config_path() else {
            debug!("No user config directory, using defaults");
            return Ok(Self::default());
        };

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) if e.is_not_found() => {
                debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => {
                warn!("Failed to load config: {}, using defaults", e);
                Ok(Self::default())
            }
        }
    }

    /// Per-user config file location
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("termtris").join(CONFIG_FILE))
    }

    /// Capacity after applying the backend default
    pub fn effective_capacity(&self) -> usize {
        self.capacity
            .unwrap_or_else(|| self.backend.default_capacity())
    }

    /// Reject settings no store can work with
    pub fn validate(&self) -> Result<()> {
        let capacity = self.effective_capacity();
        if capacity == 0 {
            return Err(Error::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        if capacity > MAX_CAPACITY {
            return Err(Error::InvalidConfig(format!(
                "capacity {} exceeds the maximum of {}",
                capacity, MAX_CAPACITY
            )));
        }
        if self.path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("score path is empty".to_string()));
        }
        Ok(())
    }

    /// Build the configured storage provider
    pub fn open_store(&self) -> Result<StoreBackend> {
        self.validate()?;
        let capacity = self.effective_capacity();
        let store: StoreBackend = match self.backend {
            StoreKind::Text => TextFileStore::new(&self.path, capacity).into(),
            StoreKind::Embedded => EmbeddedStore::new(&self.path, self.offset, capacity).into(),
        };
        debug!(
            "Using {} store at {} (capacity {})",
            self.backend,
            self.path.display(),
            capacity
        );
        Ok(store)
    }
}

/// Builder for ScoreConfig
#[derive(Debug, Clone, Default)]
pub struct ScoreConfigBuilder {
    backend: Option<StoreKind>,
    path: Option<PathBuf>,
    capacity: Option<usize>,
    offset: Option<u64>,
}

impl ScoreConfigBuilder {
    /// Set the storage provider
    pub fn backend(mut self, backend: StoreKind) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the backing file path
    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the maximum number of entries
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the embedded table offset
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Build the configuration
    pub fn build(self) -> ScoreConfig {
        let default = ScoreConfig::default();
        ScoreConfig {
            backend: self.backend.unwrap_or(default.backend),
            path: self.path.unwrap_or(default.path),
            capacity: self.capacity.or(default.capacity),
            offset: self.offset.unwrap_or(default.offset),
        }
    }
}

/// `$TERMTRIS_SCOREDIR/scores` when set at build time, `scores` otherwise
fn default_score_path() -> PathBuf {
    match option_env!("TERMTRIS_SCOREDIR") {
        Some(dir) => Path::new(dir).join(SCORE_FILE_NAME),
        None => PathBuf::from(SCORE_FILE_NAME),
    }
}
