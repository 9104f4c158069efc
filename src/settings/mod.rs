//! Environment-scoped YAML settings documents.
//!
//! A document maps environment names to sections, and each section maps
//! string keys to scalar values:
//!
//! ```yaml
//! production:
//!   store:
//!     config_class: AppConfiguration
//!     site_name: Example Store
//! ```
//!
//! Entry order is preserved as written in the file.

mod error;

pub use error::SettingsError;

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

use crate::preference::PreferenceValue;

/// A parsed settings file.
#[derive(Debug, Clone, Default)]
pub struct SettingsDocument {
    environments: Vec<Environment>,
}

/// Sections configured for one environment.
#[derive(Debug, Clone)]
pub struct Environment {
    name: String,
    sections: Vec<Section>,
}

/// One top-level entry under an environment.
#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    entries: Vec<(String, PreferenceValue)>,
}

impl SettingsDocument {
    /// Reads and parses a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parses a settings document from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, SettingsError> {
        let root: Value = serde_yaml::from_str(yaml)?;
        let Value::Mapping(root) = root else {
            return Err(SettingsError::Malformed(
                "document root must be a mapping of environments".into(),
            ));
        };

        let environments = root
            .iter()
            .map(|(name, body)| parse_environment(key_to_string(name)?, body))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { environments })
    }

    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    pub fn environment(&self, name: &str) -> Result<&Environment, SettingsError> {
        self.environments
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| SettingsError::MissingEnvironment(name.to_string()))
    }

    /// Reads a single raw value at `environment -> section -> property`.
    pub fn property(
        &self,
        environment: &str,
        section: &str,
        property: &str,
    ) -> Result<&PreferenceValue, SettingsError> {
        let section = self.environment(environment)?.section(section)?;
        section.get(property).ok_or_else(|| SettingsError::MissingKey {
            section: section.name.clone(),
            key: property.to_string(),
        })
    }
}

impl Environment {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Result<&Section, SettingsError> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| SettingsError::MissingSection {
                environment: self.name.clone(),
                section: name.to_string(),
            })
    }
}

impl Section {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&PreferenceValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Entries in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &PreferenceValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// A string entry that must be present.
    pub fn require_str(&self, key: &str) -> Result<&str, SettingsError> {
        self.optional_str(key)?
            .ok_or_else(|| SettingsError::MissingKey {
                section: self.name.clone(),
                key: key.to_string(),
            })
    }

    /// A string entry that may be absent or null.
    pub fn optional_str(&self, key: &str) -> Result<Option<&str>, SettingsError> {
        match self.get(key) {
            None | Some(PreferenceValue::Null) => Ok(None),
            Some(PreferenceValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(self.invalid(key, format!("expected a string, got {}", other.kind()))),
        }
    }

    /// An integer entry that may be absent or null. Numeric strings are accepted.
    pub fn optional_i64(&self, key: &str) -> Result<Option<i64>, SettingsError> {
        match self.get(key) {
            None | Some(PreferenceValue::Null) => Ok(None),
            Some(PreferenceValue::Integer(i)) => Ok(Some(*i)),
            Some(PreferenceValue::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| self.invalid(key, format!("expected an integer, got {:?}", s))),
            Some(other) => Err(self.invalid(key, format!("expected an integer, got {}", other.kind()))),
        }
    }

    fn invalid(&self, key: &str, reason: String) -> SettingsError {
        SettingsError::InvalidValue {
            section: self.name.clone(),
            key: key.to_string(),
            reason,
        }
    }
}

fn parse_environment(name: String, body: &Value) -> Result<Environment, SettingsError> {
    let sections = match body {
        Value::Null => Vec::new(),
        Value::Mapping(map) => map
            .iter()
            .map(|(section, body)| parse_section(key_to_string(section)?, body))
            .collect::<Result<Vec<_>, _>>()?,
        _ => {
            return Err(SettingsError::Malformed(format!(
                "environment {} must be a mapping of sections",
                name
            )));
        }
    };

    Ok(Environment { name, sections })
}

fn parse_section(name: String, body: &Value) -> Result<Section, SettingsError> {
    let map: &Mapping = match body {
        Value::Mapping(map) => map,
        _ => {
            return Err(SettingsError::Malformed(format!(
                "section {} must be a mapping of keys to values",
                name
            )));
        }
    };

    let mut entries = Vec::with_capacity(map.len());
    for (key, value) in map {
        let key = key_to_string(key)?;
        let value = PreferenceValue::from_yaml(value).ok_or_else(|| SettingsError::InvalidValue {
            section: name.clone(),
            key: key.clone(),
            reason: "only scalar values can be assigned".into(),
        })?;
        entries.push((key, value));
    }

    Ok(Section { name, entries })
}

fn key_to_string(key: &Value) -> Result<String, SettingsError> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(SettingsError::Malformed(format!(
            "unsupported key {:?}",
            key
        ))),
    }
}
