//! Typed preference slots and the capabilities targets expose over them.
//!
//! A target object declares its preferences up front. Settings files can only
//! assign declared preferences, and every assignment is coerced to the
//! declared type before it is compared or stored.

mod definition;
mod error;
mod value;

pub use definition::{PreferenceDefinition, PreferenceType};
pub use error::PreferenceError;
pub use value::PreferenceValue;

use std::collections::BTreeMap;
use tracing::debug;

/// Declared preferences of one target plus the values assigned to them.
#[derive(Debug, Clone, Default)]
pub struct Preferences {
    definitions: Vec<PreferenceDefinition>,
    values: BTreeMap<String, PreferenceValue>,
}

impl Preferences {
    pub fn new(definitions: Vec<PreferenceDefinition>) -> Self {
        Self {
            definitions,
            values: BTreeMap::new(),
        }
    }

    pub fn definitions(&self) -> &[PreferenceDefinition] {
        &self.definitions
    }

    pub fn definition(&self, key: &str) -> Option<&PreferenceDefinition> {
        self.definitions.iter().find(|d| d.name == key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.definition(key).is_some()
    }

    /// Current value of a declared preference, falling back to its default.
    pub fn get(&self, key: &str) -> Option<&PreferenceValue> {
        let definition = self.definition(key)?;
        Some(self.values.get(key).unwrap_or(&definition.default))
    }

    /// Coerces `value` to the declared type of `key` without assigning it.
    pub fn coerce(&self, key: &str, value: PreferenceValue) -> Result<PreferenceValue, PreferenceError> {
        let definition = self
            .definition(key)
            .ok_or_else(|| PreferenceError::Unknown(key.to_string()))?;

        definition
            .kind
            .coerce(value.clone())
            .ok_or_else(|| PreferenceError::TypeMismatch {
                key: key.to_string(),
                expected: definition.kind,
                value,
            })
    }

    /// Assigns a preference. Returns whether the stored value changed.
    pub fn set(&mut self, key: &str, value: PreferenceValue) -> Result<bool, PreferenceError> {
        let value = self.coerce(key, value)?;
        if self.get(key) == Some(&value) {
            return Ok(false);
        }
        self.values.insert(key.to_string(), value);
        Ok(true)
    }

    /// Loads previously persisted values.
    ///
    /// Stored keys that are no longer declared are dropped.
    pub fn load(&mut self, stored: BTreeMap<String, PreferenceValue>) {
        for (key, value) in stored {
            if self.has(&key) {
                self.values.insert(key, value);
            } else {
                debug!(key = %key, "Ignoring stored value for undeclared preference");
            }
        }
    }

    /// Values explicitly assigned or loaded, excluding untouched defaults.
    pub fn values(&self) -> &BTreeMap<String, PreferenceValue> {
        &self.values
    }

    /// Log-safe rendering of a value for `key`.
    pub fn display_value(&self, key: &str, value: &PreferenceValue) -> String {
        match self.definition(key) {
            Some(definition) => definition.display_value(value),
            None => value.to_string(),
        }
    }
}

/// An object whose preferences can be read and written by name.
pub trait PreferenceTarget {
    fn preferences(&self) -> &Preferences;

    fn preferences_mut(&mut self) -> &mut Preferences;

    fn has_preference(&self, key: &str) -> bool {
        self.preferences().has(key)
    }

    fn get_preference(&self, key: &str) -> Option<&PreferenceValue> {
        self.preferences().get(key)
    }

    fn set_preference(&mut self, key: &str, value: PreferenceValue) -> Result<bool, PreferenceError> {
        self.preferences_mut().set(key, value)
    }
}

/// Self-validation run after preferences are assigned.
pub trait Validatable {
    /// Returns the validation messages when the object is invalid.
    fn validate(&self) -> Result<(), Vec<String>>;
}
