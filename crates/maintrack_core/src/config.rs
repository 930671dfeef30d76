//! Core runtime configuration.
//!
//! # Responsibility
//! - Describe tunables: upcoming window, editor allow-list, storage and
//!   logging locations.
//! - Derive runtime collaborators from those values.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - A missing config file yields defaults; a malformed one is an error.

use crate::access::AllowListPolicy;
use crate::logging::default_log_level;
use crate::schedule::status::{StatusPolicy, DEFAULT_UPCOMING_WITHIN_DAYS};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Inclusive upper bound (days) of the `Upcoming` status window.
    pub upcoming_within_days: u32,
    /// Identities treated as editors. UI affordance only.
    pub editor_allow_list: Vec<String>,
    /// SQLite database path; `None` means in-memory.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute log directory; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            upcoming_within_days: DEFAULT_UPCOMING_WITHIN_DAYS,
            editor_allow_list: Vec::new(),
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Parse)
    }

    /// Reads `path`, returning defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_json_str(&raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn status_policy(&self) -> StatusPolicy {
        StatusPolicy {
            upcoming_within_days: self.upcoming_within_days,
        }
    }

    pub fn editor_policy(&self) -> AllowListPolicy {
        AllowListPolicy::new(&self.editor_allow_list)
    }
}
