//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; invalid log levels fall back to the default.

use crate::logging::{default_log_level, normalize_level};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "QUESTLOG_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "QUESTLOG_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "QUESTLOG_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "questlog.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file backing the key-value store.
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = non_blank(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_level = non_blank(LOG_LEVEL_ENV)
            .and_then(|value| normalize_level(&value).ok())
            .unwrap_or_else(default_log_level)
            .to_string();
        let log_dir = non_blank(LOG_DIR_ENV).map(PathBuf::from);

        Self {
            db_path,
            log_level,
            log_dir,
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = CoreConfig::from_lookup(lookup(&[]));
        assert!(config.db_path.ends_with("questlog.sqlite3"));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn reads_and_normalizes_values() {
        let config = CoreConfig::from_lookup(lookup(&[
            (DB_PATH_ENV, " /data/quest.db "),
            (LOG_LEVEL_ENV, "WARNING"),
            (LOG_DIR_ENV, "/var/log/questlog"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/data/quest.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/questlog")));
    }

    #[test]
    fn blank_and_invalid_values_fall_back() {
        let config = CoreConfig::from_lookup(lookup(&[
            (DB_PATH_ENV, "   "),
            (LOG_LEVEL_ENV, "verbose"),
        ]));
        assert!(config.db_path.ends_with("questlog.sqlite3"));
        assert_eq!(config.log_level, super::default_log_level());
    }
}
