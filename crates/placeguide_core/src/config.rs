//! Runtime configuration resolution.
//!
//! # Responsibility
//! - Resolve database path, log directory and log level for a shell.
//!
//! # Invariants
//! - Precedence is explicit override, then environment, then default.
//! - Blank values are treated as unset at every level.
//! - Resolution never touches the filesystem.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DB_PATH_ENV: &str = "PLACEGUIDE_DB_PATH";
pub const LOG_DIR_ENV: &str = "PLACEGUIDE_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "PLACEGUIDE_LOG_LEVEL";
pub const DEFAULT_DB_FILE_NAME: &str = "placeguide.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "log directory must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Caller-supplied values that win over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// `None` leaves file logging disabled.
    pub log_dir: Option<PathBuf>,
    pub log_level: &'static str,
}

impl AppConfig {
    /// Resolves configuration against the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolves configuration against an arbitrary variable lookup.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let db_path = non_blank_path(overrides.db_path)
            .or_else(|| env_path(&lookup, DB_PATH_ENV))
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let log_dir =
            non_blank_path(overrides.log_dir).or_else(|| env_path(&lookup, LOG_DIR_ENV));
        if let Some(dir) = log_dir.as_deref() {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.to_path_buf()));
            }
        }

        let log_level = match overrides
            .log_level
            .filter(|value| !value.trim().is_empty())
            .or_else(|| env_text(&lookup, LOG_LEVEL_ENV))
        {
            Some(raw) => normalize_level(&raw).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        Ok(Self {
            db_path,
            log_dir,
            log_level,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

fn non_blank_path(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|value| !value.as_os_str().to_string_lossy().trim().is_empty())
}

fn env_text(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_path(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<PathBuf> {
    env_text(lookup, key).map(PathBuf::from)
}
