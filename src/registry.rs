//! Name-keyed registries used to resolve section class names.
//!
//! Settings files name the class that owns a section (`config_class`,
//! `gateway_class`). Instead of resolving those names dynamically, callers
//! register every resolvable class up front and inject the registry.

use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

/// Class resolution error.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown class {0}")]
    UnknownClass(String),
    #[error("failed to construct {class}: {reason}")]
    Construction { class: String, reason: String },
}

/// Maps class names to registered entries.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: HashMap<String, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entry` under `name`, replacing any previous registration.
    pub fn register(&mut self, name: impl Into<String>, entry: T) {
        let name = name.into();
        if self.entries.contains_key(&name) {
            warn!(class = %name, "Overriding existing class registration");
        }
        self.entries.insert(name, entry);
    }

    pub fn resolve(&self, name: &str) -> Result<&T, RegistryError> {
        self.entries
            .get(name)
            .ok_or_else(|| RegistryError::UnknownClass(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
