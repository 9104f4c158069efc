//! Settings file locations.

use serde::Deserialize;

use crate::initializer::{DEFAULT_CONFIG_FILE, DEFAULT_GATEWAYS_FILE};

/// Paths of the settings files to apply.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Configuration preferences file (default: config/config.yml).
    #[serde(default = "default_config_file")]
    pub config: String,
    /// Gateway preferences file (default: config/gateways.yml).
    #[serde(default = "default_gateways_file")]
    pub gateways: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            config: default_config_file(),
            gateways: default_gateways_file(),
        }
    }
}

fn default_config_file() -> String {
    DEFAULT_CONFIG_FILE.to_string()
}

fn default_gateways_file() -> String {
    DEFAULT_GATEWAYS_FILE.to_string()
}
