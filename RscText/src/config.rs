//! Resolver configuration (`rsctext.toml`)
//!
//! ```toml
//! archive_dir = "/games/arena"
//! archive_name = "TEXT.RSC"
//! collection = "Internal_RSC"
//! string_tables = ["Text/Localization"]
//! localized_wait_ms = 250
//! debug_logging = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::formats::rsc::DEFAULT_ARCHIVE_NAME;

/// Collection that holds localized copies of legacy text records
pub const DEFAULT_COLLECTION: &str = "Internal_RSC";

fn default_archive_name() -> String {
    DEFAULT_ARCHIVE_NAME.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

/// What the resolver does when a localized lookup is still pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalizedWait {
    /// Treat a pending lookup as missing and drop its handle
    #[default]
    NonBlocking,
    /// Wait up to the given duration, then fall back
    Bounded(Duration),
}

/// Settings for building a [`TextResolver`](crate::resolver::TextResolver)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Directory containing the legacy archive
    #[serde(default)]
    pub archive_dir: Option<PathBuf>,
    /// File name of the legacy archive inside `archive_dir`
    #[serde(default = "default_archive_name")]
    pub archive_name: String,
    /// Localized collection queried for record IDs
    #[serde(default = "default_collection")]
    pub collection: String,
    /// String table files or directories to load
    #[serde(default)]
    pub string_tables: Vec<PathBuf>,
    /// Milliseconds to wait on a pending localized lookup; absent means never wait
    #[serde(default)]
    pub localized_wait_ms: Option<u64>,
    #[serde(default)]
    pub debug_logging: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            archive_dir: None,
            archive_name: default_archive_name(),
            collection: default_collection(),
            string_tables: Vec::new(),
            localized_wait_ms: None,
            debug_logging: false,
        }
    }
}

impl ResolverConfig {
    /// Load a configuration file.
    ///
    /// Relative `archive_dir` and `string_tables` paths are resolved against
    /// the directory containing the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;

        if let Some(base) = path.parent() {
            config.archive_dir = config.archive_dir.map(|dir| base.join(dir));
            config.string_tables = config
                .string_tables
                .into_iter()
                .map(|table| base.join(table))
                .collect();
        }

        tracing::debug!("Loaded resolver config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`](crate::Error::ConfigError) on invalid TOML.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Wait policy derived from `localized_wait_ms`
    #[must_use]
    pub fn localized_wait(&self) -> LocalizedWait {
        match self.localized_wait_ms {
            Some(ms) => LocalizedWait::Bounded(Duration::from_millis(ms)),
            None => LocalizedWait::NonBlocking,
        }
    }
}
