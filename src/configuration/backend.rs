//! Admin backend configuration.

use crate::configuration::Configuration;
use crate::preference::{PreferenceDefinition, PreferenceTarget, PreferenceType, Preferences};

/// Settings for the admin interface. Has no validity check.
#[derive(Debug, Clone)]
pub struct BackendConfiguration {
    preferences: Preferences,
}

impl BackendConfiguration {
    pub const CLASS_NAME: &'static str = "BackendConfiguration";

    pub fn new() -> Self {
        Self {
            preferences: Preferences::new(vec![
                PreferenceDefinition::new("locale", PreferenceType::String).with_default("en"),
                PreferenceDefinition::new("admin_products_per_page", PreferenceType::Integer)
                    .with_default(10),
                PreferenceDefinition::new("admin_orders_per_page", PreferenceType::Integer)
                    .with_default(15),
            ]),
        }
    }

    pub fn factory() -> Result<Box<dyn Configuration>, String> {
        Ok(Box::new(Self::new()))
    }
}

impl Default for BackendConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceTarget for BackendConfiguration {
    fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }
}

impl Configuration for BackendConfiguration {
    fn class_name(&self) -> &str {
        Self::CLASS_NAME
    }
}
