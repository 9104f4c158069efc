//! Application-level configuration.

use serde::Deserialize;

const DEFAULT_ENV: &str = "development";
const TEST_ENV: &str = "test";

/// Application name, settings environment and log level.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Name attached to logs and error reports.
    pub name: String,
    /// Settings environment to apply (default: development).
    #[serde(default = "default_env")]
    pub env: String,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// True when running against the test environment.
    pub fn is_test(&self) -> bool {
        self.env == TEST_ENV
    }
}

fn default_env() -> String {
    DEFAULT_ENV.to_string()
}
