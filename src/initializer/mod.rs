//! Loads settings files into configuration and gateway preferences.
//!
//! Two appliers share the same settings format and warning accumulator:
//!
//! - [`ConfigApplier`] constructs the configuration class named by each
//!   section's `config_class` and assigns the remaining keys.
//! - [`GatewayApplier`] looks up the gateway record named by `gateway_class`
//!   plus `gateway_id` or `gateway_name` and assigns the remaining keys.
//!
//! [`PreferenceInitializer`] bundles both with their stores and keeps the
//! warnings collected across calls.

mod config_applier;
mod error;
mod gateway_applier;

pub use config_applier::ConfigApplier;
pub use error::ApplyError;
pub use gateway_applier::GatewayApplier;

use std::path::Path;
use std::sync::Arc;

use crate::configuration::{Configuration, ConfigurationRegistry};
use crate::gateway::GatewayRegistry;
use crate::preference::PreferenceValue;
use crate::reporter::ErrorReporter;
use crate::settings::SettingsDocument;
use crate::storage::{GatewayStore, PreferenceStore};
use crate::warnings::Warnings;

pub const CONFIG_CLASS: &str = "config_class";
pub const GATEWAY_CLASS: &str = "gateway_class";
pub const GATEWAY_ID: &str = "gateway_id";
pub const GATEWAY_NAME: &str = "gateway_name";

pub const DEFAULT_CONFIG_FILE: &str = "config/config.yml";
pub const DEFAULT_GATEWAYS_FILE: &str = "config/gateways.yml";

/// Counts from one apply call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub sections_applied: usize,
    pub sections_skipped: usize,
    pub preferences_written: usize,
}

/// Entry point that owns the registries, stores and collected warnings.
pub struct PreferenceInitializer {
    environment: String,
    configurations: ConfigurationRegistry,
    gateways: GatewayRegistry,
    preference_store: Arc<dyn PreferenceStore>,
    gateway_store: Arc<dyn GatewayStore>,
    reporter: Option<Arc<dyn ErrorReporter>>,
    verify_schema: bool,
    warnings: Warnings,
}

impl PreferenceInitializer {
    /// Creates an initializer with the built-in registries.
    ///
    /// Schema verification is on when `environment` is `"test"`.
    pub fn new(
        environment: impl Into<String>,
        preference_store: Arc<dyn PreferenceStore>,
        gateway_store: Arc<dyn GatewayStore>,
    ) -> Self {
        let environment = environment.into();
        let verify_schema = environment == "test";

        Self {
            environment,
            configurations: ConfigurationRegistry::with_defaults(),
            gateways: GatewayRegistry::with_defaults(),
            preference_store,
            gateway_store,
            reporter: None,
            verify_schema,
            warnings: Warnings::new(),
        }
    }

    pub fn with_configurations(mut self, registry: ConfigurationRegistry) -> Self {
        self.configurations = registry;
        self
    }

    pub fn with_gateways(mut self, registry: GatewayRegistry) -> Self {
        self.gateways = registry;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn verify_schema(mut self, verify: bool) -> Self {
        self.verify_schema = verify;
        self
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn warnings(&self) -> &[String] {
        self.warnings.entries()
    }

    pub fn reset(&mut self) {
        self.warnings.reset();
    }

    /// Applies a configuration settings file for the current environment.
    pub async fn load_configs(&mut self, path: impl AsRef<Path>) -> Result<ApplySummary, ApplyError> {
        let document = SettingsDocument::load(path)?;
        ConfigApplier::new(&self.configurations, self.preference_store.as_ref())
            .apply_config(&self.environment, &document, &mut self.warnings)
            .await
    }

    /// Applies a gateway settings file for the current environment.
    pub async fn load_gateways(&mut self, path: impl AsRef<Path>) -> Result<ApplySummary, ApplyError> {
        let document = SettingsDocument::load(path)?;
        GatewayApplier::new(&self.gateways, self.gateway_store.as_ref())
            .with_reporter(self.reporter.as_deref())
            .verify_schema(self.verify_schema)
            .apply_gateways(&self.environment, &document, &mut self.warnings)
            .await
    }

    /// Reads one raw value from a settings file without applying anything.
    pub fn load_config_property(
        &self,
        section: &str,
        property: &str,
        path: impl AsRef<Path>,
    ) -> Result<PreferenceValue, ApplyError> {
        let document = SettingsDocument::load(path)?;
        let value = document.property(&self.environment, section, property)?;
        Ok(value.clone())
    }

    /// Constructs a configuration with its persisted preferences loaded.
    pub async fn configuration(&self, class_name: &str) -> Result<Box<dyn Configuration>, ApplyError> {
        ConfigApplier::new(&self.configurations, self.preference_store.as_ref())
            .instantiate(class_name)
            .await
    }
}

#[cfg(test)]
mod tests;
