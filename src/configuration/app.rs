//! Store-wide application configuration.

use crate::configuration::Configuration;
use crate::preference::{
    PreferenceDefinition, PreferenceTarget, PreferenceType, Preferences, Validatable,
};

/// General store settings.
#[derive(Debug, Clone)]
pub struct AppConfiguration {
    preferences: Preferences,
}

impl AppConfiguration {
    pub const CLASS_NAME: &'static str = "AppConfiguration";

    pub fn new() -> Self {
        Self {
            preferences: Preferences::new(vec![
                PreferenceDefinition::new("site_name", PreferenceType::String)
                    .with_default("Demo Store"),
                PreferenceDefinition::new("site_url", PreferenceType::String)
                    .with_default("demo.example.com"),
                PreferenceDefinition::new("currency", PreferenceType::String).with_default("USD"),
                PreferenceDefinition::new("allow_guest_checkout", PreferenceType::Boolean)
                    .with_default(true),
                PreferenceDefinition::new("track_inventory_levels", PreferenceType::Boolean)
                    .with_default(true),
                PreferenceDefinition::new("orders_per_page", PreferenceType::Integer)
                    .with_default(15),
                PreferenceDefinition::new("default_country_id", PreferenceType::Integer),
            ]),
        }
    }

    pub fn factory() -> Result<Box<dyn Configuration>, String> {
        Ok(Box::new(Self::new()))
    }
}

impl Default for AppConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceTarget for AppConfiguration {
    fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }
}

impl Validatable for AppConfiguration {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.get_preference("site_name").is_none_or(|v| v.is_blank()) {
            errors.push("site_name can't be blank".to_string());
        }

        match self.get_preference("currency").and_then(|v| v.as_str()) {
            None => errors.push("currency can't be blank".to_string()),
            Some(code) if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) => {
                errors.push(format!("currency {} is not a three-letter code", code));
            }
            Some(_) => {}
        }

        if let Some(per_page) = self.get_preference("orders_per_page").and_then(|v| v.as_i64()) {
            if per_page <= 0 {
                errors.push("orders_per_page must be positive".to_string());
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Configuration for AppConfiguration {
    fn class_name(&self) -> &str {
        Self::CLASS_NAME
    }

    fn validation(&self) -> Option<&dyn Validatable> {
        Some(self)
    }
}
