//! Schema verification configuration.

use serde::Deserialize;

/// Controls how a missing database table is treated while applying gateways.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerificationConfig {
    /// Return missing-table errors instead of recording them as warnings.
    /// Defaults to true in the "test" environment.
    pub strict_schema: Option<bool>,
}
