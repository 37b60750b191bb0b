/// Runtime configuration
///
/// Everything comes from environment variables with sensible defaults,
/// so a fresh install works without any setup.

use crate::error::{CartError, Result};
use std::path::PathBuf;

pub const DB_ENV: &str = "CARTWISE_DB";
pub const LANG_ENV: &str = "CARTWISE_LANG";
pub const LOG_ENV: &str = "CARTWISE_LOG";

pub const DEFAULT_LOCALE: &str = "en-US";
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite database file
    pub db_path: PathBuf,
    /// Locale tag recorded with every command. Informational only.
    pub locale: String,
    /// tracing-subscriber filter directive
    pub log_filter: String,
}

impl Config {
    /// Load config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load config through an arbitrary key lookup
    ///
    /// Split out from `from_env` so tests don't have to mutate the real environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = match non_empty(DB_ENV) {
            Some(path) => PathBuf::from(path),
            None => Self::default_db_path()?,
        };

        let locale = non_empty(LANG_ENV).unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        let log_filter = non_empty(LOG_ENV)
            .or_else(|| non_empty("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            db_path,
            locale,
            log_filter,
        })
    }

    /// `~/.cartwise/list.db`
    pub fn default_db_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            CartError::Config(format!(
                "Could not determine home directory; set {} instead",
                DB_ENV
            ))
        })?;

        Ok(home.join(".cartwise").join("list.db"))
    }

    /// Same config with a different locale (the CLI `--lang` flag)
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}
