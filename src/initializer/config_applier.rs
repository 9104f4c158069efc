//! Applies settings sections to freshly constructed configuration objects.

use tracing::{debug, info};

use crate::configuration::{Configuration, ConfigurationRegistry};
use crate::initializer::{ApplyError, ApplySummary, CONFIG_CLASS};
use crate::preference::PreferenceTarget;
use crate::settings::{Section, SettingsDocument};
use crate::storage::PreferenceStore;
use crate::warnings::Warnings;

/// Writes `config_class` sections into configuration preferences.
pub struct ConfigApplier<'a> {
    registry: &'a ConfigurationRegistry,
    store: &'a dyn PreferenceStore,
}

impl<'a> ConfigApplier<'a> {
    pub fn new(registry: &'a ConfigurationRegistry, store: &'a dyn PreferenceStore) -> Self {
        Self { registry, store }
    }

    /// Applies every section of `environment` in file order.
    ///
    /// Unknown preference keys are recorded in `warnings`. Everything else
    /// that goes wrong is returned as an error, including a section whose
    /// object fails validation after assignment. Sections before the failing
    /// one stay applied.
    pub async fn apply_config(
        &self,
        environment: &str,
        document: &SettingsDocument,
        warnings: &mut Warnings,
    ) -> Result<ApplySummary, ApplyError> {
        let settings = document.environment(environment)?;
        let mut summary = ApplySummary::default();

        for section in settings.sections() {
            let written = self.apply_section(section, warnings).await?;
            summary.sections_applied += 1;
            summary.preferences_written += written;
        }

        info!(
            environment = %environment,
            sections = summary.sections_applied,
            written = summary.preferences_written,
            "Configuration preferences applied"
        );
        Ok(summary)
    }

    /// Constructs `class_name` and loads its persisted preferences.
    pub async fn instantiate(&self, class_name: &str) -> Result<Box<dyn Configuration>, ApplyError> {
        let mut config = self.registry.construct(class_name)?;
        let stored = self.store.load_preferences(config.class_name()).await?;
        config.preferences_mut().load(stored);
        Ok(config)
    }

    async fn apply_section(
        &self,
        section: &Section,
        warnings: &mut Warnings,
    ) -> Result<usize, ApplyError> {
        let class_name = section.require_str(CONFIG_CLASS)?;
        let mut config = self.instantiate(class_name).await?;
        let mut written = 0;

        for (key, value) in section.entries() {
            if key == CONFIG_CLASS {
                continue;
            }

            if !config.has_preference(key) {
                warnings.push(format!("{} is not a preference on {}", key, config.class_name()));
                continue;
            }

            let desired = config
                .preferences()
                .coerce(key, value.clone())
                .map_err(ApplyError::preference(section.name()))?;

            if config.get_preference(key) == Some(&desired) {
                continue;
            }

            debug!(
                class = %class_name,
                key = %key,
                value = %config.preferences().display_value(key, &desired),
                "Setting preference"
            );

            config
                .set_preference(key, desired.clone())
                .map_err(ApplyError::preference(section.name()))?;
            self.store
                .save_preference(config.class_name(), key, &desired)
                .await?;
            written += 1;
        }

        if let Some(validation) = config.validation() {
            if let Err(messages) = validation.validate() {
                return Err(ApplyError::Invalid {
                    class: class_name.to_string(),
                    messages,
                });
            }
        }

        Ok(written)
    }
}
