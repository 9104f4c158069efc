//! Configuration loading and validation for the initializer binary.
//!
//! Uses serde_yaml to load the YAML configuration file, with environment
//! variable overrides for the environment name, the database path and
//! credentials.

mod app;
mod duration;
mod error;
mod files;
mod reporter;
mod storage;
mod verification;

pub use app::AppConfig;
pub use error::ConfigError;
pub use files::FilesConfig;
pub use reporter::ReporterConfig;
pub use storage::StorageConfig;
pub use verification::VerificationConfig;

use serde::Deserialize;
use std::{env, fs};

/// Environment variable that selects the settings environment.
pub const ENV_VAR: &str = "PREFERENCES_ENV";
/// Environment variable that overrides the database path.
pub const DATABASE_PATH_VAR: &str = "DATABASE_PATH";
/// Environment variable holding the error reporter API key.
pub const REPORTER_API_KEY_VAR: &str = "ERROR_REPORTER_API_KEY";

/// Root configuration structure for the initializer.
///
/// Required sections: app.
/// Optional sections: files, storage, reporter, verification.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Application name, environment and log level.
    pub app: AppConfig,
    /// Settings file locations (optional).
    #[serde(default)]
    pub files: FilesConfig,
    /// Preference database (optional).
    #[serde(default)]
    pub storage: StorageConfig,
    /// Error reporting for swallowed storage errors (optional).
    pub reporter: Option<ReporterConfig>,
    /// Missing-table handling (optional).
    #[serde(default)]
    pub verification: VerificationConfig,
}

impl Config {
    /// Load configuration from a YAML file at the given path.
    ///
    /// First loads environment variables from `.env` file (if exists),
    /// then loads the YAML config and applies overrides from:
    /// - `PREFERENCES_ENV`, `DATABASE_PATH`
    /// - `ERROR_REPORTER_API_KEY`
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore error if not found)
        dotenvy::dotenv().ok();

        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_string(),
            source,
        })?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Apply overrides from a variable lookup.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(env) = lookup(ENV_VAR).filter(|v| !v.is_empty()) {
            self.app.env = env;
        }

        if let Some(path) = lookup(DATABASE_PATH_VAR).filter(|v| !v.is_empty()) {
            self.storage.path = path;
        }

        if let Some(ref mut reporter) = self.reporter {
            if reporter.enabled {
                reporter.api_key = lookup(REPORTER_API_KEY_VAR).unwrap_or_default();
            }
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.is_empty() {
            return Err(ConfigError::Validation("app.name is required".into()));
        }

        if self.app.env.is_empty() {
            return Err(ConfigError::Validation(format!(
                "app.env is required (or set {})",
                ENV_VAR
            )));
        }

        if self.files.config.is_empty() || self.files.gateways.is_empty() {
            return Err(ConfigError::Validation(
                "files.config and files.gateways must not be empty".into(),
            ));
        }

        if self.storage.path.is_empty() {
            return Err(ConfigError::Validation("storage.path is required".into()));
        }

        if let Some(max_connections) = self.storage.max_connections {
            if max_connections == 0 {
                return Err(ConfigError::Validation(
                    "storage.max_connections must be positive".into(),
                ));
            }
        }

        if let Some(ref reporter) = self.reporter {
            if reporter.enabled && reporter.endpoint.is_empty() {
                return Err(ConfigError::Validation(
                    "reporter.endpoint is required when the reporter is enabled".into(),
                ));
            }
        }

        Ok(())
    }

    /// Whether missing tables should fail the gateway load.
    pub fn strict_schema(&self) -> bool {
        self.verification
            .strict_schema
            .unwrap_or_else(|| self.app.is_test())
    }

    /// The reporter settings when reporting is enabled.
    pub fn active_reporter(&self) -> Option<&ReporterConfig> {
        self.reporter.as_ref().filter(|r| r.enabled)
    }
}
