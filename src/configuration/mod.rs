//! Application-wide configuration objects.
//!
//! A configuration is constructed fresh for every settings section that names
//! it, hydrated from the preference store, and then updated in place.

mod app;
mod backend;

pub use app::AppConfiguration;
pub use backend::BackendConfiguration;

use std::fmt;

use crate::preference::{PreferenceTarget, Validatable};
use crate::registry::{Registry, RegistryError};

/// A configuration class whose preferences can be set from a settings file.
pub trait Configuration: PreferenceTarget + Send + Sync + fmt::Debug {
    /// Name the class is registered and persisted under.
    fn class_name(&self) -> &str;

    /// The validity check, for classes that have one.
    fn validation(&self) -> Option<&dyn Validatable> {
        None
    }
}

/// Constructs a new configuration instance.
pub type ConfigurationFactory = fn() -> Result<Box<dyn Configuration>, String>;

/// Registry of constructible configuration classes.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationRegistry {
    factories: Registry<ConfigurationFactory>,
}

impl ConfigurationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in configuration classes.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(AppConfiguration::CLASS_NAME, AppConfiguration::factory);
        registry.register(BackendConfiguration::CLASS_NAME, BackendConfiguration::factory);
        registry
    }

    pub fn register(&mut self, class_name: impl Into<String>, factory: ConfigurationFactory) {
        self.factories.register(class_name, factory);
    }

    /// Constructs a new instance of `class_name`.
    pub fn construct(&self, class_name: &str) -> Result<Box<dyn Configuration>, RegistryError> {
        let factory = self.factories.resolve(class_name)?;
        factory().map_err(|reason| RegistryError::Construction {
            class: class_name.to_string(),
            reason,
        })
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.factories.contains(class_name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.names()
    }
}
