//! Storage configuration.

use serde::Deserialize;

use crate::storage::SqliteStorageConfig;

/// Preference database settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file (overridden by DATABASE_PATH).
    #[serde(default = "default_path")]
    pub path: String,
    /// Connection pool size (default: 5).
    pub max_connections: Option<u32>,
    /// Create missing tables before applying settings.
    #[serde(default)]
    pub migrate: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            max_connections: None,
            migrate: false,
        }
    }
}

impl StorageConfig {
    pub fn sqlite(&self) -> SqliteStorageConfig {
        let defaults = SqliteStorageConfig::default();
        SqliteStorageConfig {
            path: self.path.clone(),
            max_connections: self.max_connections.unwrap_or(defaults.max_connections),
        }
    }
}

fn default_path() -> String {
    SqliteStorageConfig::default().path
}
