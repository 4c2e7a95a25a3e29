//! Named defaults and process configuration.
//!
//! # Responsibility
//! - Hold the user-facing default texts and the default list order.
//! - Parse the optional JSON configuration used by host binaries.
//!
//! # Invariants
//! - Every `CoreConfig` field has a default, so `{}` is a valid config.

use crate::logging::default_log_level;
use crate::model::order::{NoteOrder, OrderDirection};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Order applied to a fresh note list.
pub const DEFAULT_NOTE_ORDER: NoteOrder = NoteOrder::Date(OrderDirection::Descending);

pub const TITLE_REQUIRED_MESSAGE: &str = "title required";
pub const CONTENT_REQUIRED_MESSAGE: &str = "content required";

pub const TITLE_HINT: &str = "Enter title...";
pub const CONTENT_HINT: &str = "Enter some content";

/// File name used when a host opens the note database in a data directory.
pub const DATABASE_FILE_NAME: &str = "notes_db";

/// Host-level configuration for the core.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files. Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    /// Database file, or a directory that holds `notes_db`. An in-memory
    /// database is used when unset.
    pub db_path: Option<PathBuf>,
    /// Order the note list starts with.
    pub default_order: NoteOrder,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            db_path: None,
            default_order: DEFAULT_NOTE_ORDER,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl CoreConfig {
    /// Parses a JSON document, filling missing fields with defaults.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Resolves `db_path` to a database file; `None` means in-memory.
    pub fn database_file(&self) -> Option<PathBuf> {
        self.db_path.as_deref().map(resolve_database_file)
    }
}

fn resolve_database_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(DATABASE_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}
