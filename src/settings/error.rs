//! Settings document error types.

use thiserror::Error;

/// Error raised while reading or navigating a settings document.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("malformed settings: {0}")]
    Malformed(String),
    #[error("environment {0} not found in settings")]
    MissingEnvironment(String),
    #[error("section {section} not found in environment {environment}")]
    MissingSection { environment: String, section: String },
    #[error("section {section} is missing {key}")]
    MissingKey { section: String, key: String },
    #[error("section {section}: invalid value for {key}: {reason}")]
    InvalidValue {
        section: String,
        key: String,
        reason: String,
    },
}
