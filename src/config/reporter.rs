//! Error reporter configuration.

use serde::Deserialize;
use std::time::Duration;

use super::duration;

/// Settings for forwarding swallowed storage errors to a collector.
#[derive(Debug, Clone, Deserialize)]
pub struct ReporterConfig {
    /// Whether errors are forwarded.
    #[serde(default)]
    pub enabled: bool,
    /// Collector endpoint accepting JSON reports.
    #[serde(default)]
    pub endpoint: String,
    /// API key (loaded from ERROR_REPORTER_API_KEY env var).
    #[serde(skip)]
    pub api_key: String,
    /// HTTP timeout for a single report (default: 10s).
    #[serde(default, with = "duration")]
    pub timeout: Duration,
}
