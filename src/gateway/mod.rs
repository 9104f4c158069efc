//! Payment gateway classes and persisted gateway records.
//!
//! Unlike configurations, gateways are not constructed: a settings section
//! points at an existing record by id or by name, and only that record's
//! preferences are updated.

use std::collections::BTreeMap;
use std::fmt;

use crate::preference::{
    PreferenceDefinition, PreferenceTarget, PreferenceType, PreferenceValue, Preferences,
};
use crate::registry::{Registry, RegistryError};
use crate::storage::{GatewayRow, GatewayStore, StorageError};

/// A gateway type with its declared preferences.
#[derive(Debug, Clone)]
pub struct GatewayClass {
    name: String,
    definitions: Vec<PreferenceDefinition>,
}

impl GatewayClass {
    pub fn new(name: impl Into<String>, definitions: Vec<PreferenceDefinition>) -> Self {
        Self {
            name: name.into(),
            definitions,
        }
    }

    pub fn braintree() -> Self {
        Self::new(
            "BraintreeGateway",
            vec![
                PreferenceDefinition::new("merchant_id", PreferenceType::String),
                PreferenceDefinition::new("merchant_account_id", PreferenceType::String),
                PreferenceDefinition::new("public_key", PreferenceType::String),
                PreferenceDefinition::new("private_key", PreferenceType::Password),
                PreferenceDefinition::new("client_side_encryption_key", PreferenceType::Text),
                PreferenceDefinition::new("environment", PreferenceType::String)
                    .with_default("sandbox"),
            ],
        )
    }

    pub fn stripe() -> Self {
        Self::new(
            "StripeGateway",
            vec![
                PreferenceDefinition::new("publishable_key", PreferenceType::String),
                PreferenceDefinition::new("secret_key", PreferenceType::Password),
                PreferenceDefinition::new("statement_descriptor", PreferenceType::String),
            ],
        )
    }

    pub fn bogus() -> Self {
        Self::new(
            "BogusGateway",
            vec![
                PreferenceDefinition::new("dummy_key", PreferenceType::String)
                    .with_default("PUBLICKEY123"),
                PreferenceDefinition::new("test_mode", PreferenceType::Boolean).with_default(true),
            ],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn find_by_id(
        &self,
        store: &dyn GatewayStore,
        id: i64,
    ) -> Result<Option<Gateway>, StorageError> {
        let row = store.find_gateway_by_id(&self.name, id).await?;
        Ok(row.map(|row| self.instantiate(row)))
    }

    pub async fn find_by_name(
        &self,
        store: &dyn GatewayStore,
        name: Option<&str>,
    ) -> Result<Option<Gateway>, StorageError> {
        let row = store.find_gateway_by_name(&self.name, name).await?;
        Ok(row.map(|row| self.instantiate(row)))
    }

    fn instantiate(&self, row: GatewayRow) -> Gateway {
        let mut preferences = Preferences::new(self.definitions.clone());
        let (declared, undeclared): (BTreeMap<_, _>, BTreeMap<_, _>) = row
            .preferences
            .into_iter()
            .partition(|(key, _)| preferences.has(key));
        preferences.load(declared);

        Gateway {
            id: row.id,
            gateway_type: row.gateway_type,
            name: row.name,
            active: row.active,
            preferences,
            undeclared,
        }
    }
}

/// A persisted gateway record loaded through its class.
#[derive(Debug, Clone)]
pub struct Gateway {
    id: i64,
    gateway_type: String,
    name: Option<String>,
    active: bool,
    preferences: Preferences,
    // Stored keys the class does not declare, written back untouched on save.
    undeclared: BTreeMap<String, PreferenceValue>,
}

impl Gateway {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn gateway_type(&self) -> &str {
        &self.gateway_type
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Writes the current preferences back to the store.
    ///
    /// Stored keys outside the class declaration are preserved.
    pub async fn save(&self, store: &dyn GatewayStore) -> Result<(), StorageError> {
        let mut stored = self.undeclared.clone();
        stored.extend(
            self.preferences
                .values()
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        store.save_gateway_preferences(self.id, &stored).await
    }
}

impl PreferenceTarget for Gateway {
    fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }
}

impl fmt::Display for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.gateway_type, self.id)?;
        if let Some(ref name) = self.name {
            write!(f, " ({})", name)?;
        }
        Ok(())
    }
}

/// Registry of gateway classes that settings files may name.
#[derive(Debug, Clone, Default)]
pub struct GatewayRegistry {
    classes: Registry<GatewayClass>,
}

impl GatewayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in gateway classes.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(GatewayClass::braintree());
        registry.register(GatewayClass::stripe());
        registry.register(GatewayClass::bogus());
        registry
    }

    pub fn register(&mut self, class: GatewayClass) {
        self.classes.register(class.name.clone(), class);
    }

    pub fn resolve(&self, class_name: &str) -> Result<&GatewayClass, RegistryError> {
        self.classes.resolve(class_name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.classes.names()
    }
}
