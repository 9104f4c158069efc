//! Storage interfaces and implementations for persisted preferences.

mod sqlite;

pub use sqlite::{SqliteStorage, SqliteStorageConfig};

use crate::preference::PreferenceValue;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// SQLSTATE raised by PostgreSQL for an undefined table.
const UNDEFINED_TABLE_SQLSTATE: &str = "42P01";

/// PreferenceStore persists configuration preferences, grouped by scope.
///
/// The scope is the configuration class name.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Loads every persisted value in `scope`.
    async fn load_preferences(
        &self,
        scope: &str,
    ) -> Result<BTreeMap<String, PreferenceValue>, StorageError>;

    /// Inserts or replaces a single value.
    async fn save_preference(
        &self,
        scope: &str,
        key: &str,
        value: &PreferenceValue,
    ) -> Result<(), StorageError>;
}

/// GatewayStore gives access to persisted payment gateway records.
///
/// Lookups are scoped to a gateway type, so a record is only visible through
/// the class it was created as.
#[async_trait]
pub trait GatewayStore: Send + Sync {
    async fn find_gateway_by_id(
        &self,
        gateway_type: &str,
        id: i64,
    ) -> Result<Option<GatewayRow>, StorageError>;

    /// Finds the first record with the given name. A `None` name matches
    /// records whose name is null.
    async fn find_gateway_by_name(
        &self,
        gateway_type: &str,
        name: Option<&str>,
    ) -> Result<Option<GatewayRow>, StorageError>;

    /// Replaces the stored preferences of a record.
    async fn save_gateway_preferences(
        &self,
        id: i64,
        preferences: &BTreeMap<String, PreferenceValue>,
    ) -> Result<(), StorageError>;

    /// Creates a record with empty preferences and returns its id.
    async fn insert_gateway(
        &self,
        gateway_type: &str,
        name: Option<&str>,
    ) -> Result<i64, StorageError>;

    async fn count_gateways(&self) -> Result<i64, StorageError>;
}

/// A persisted gateway record.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRow {
    pub id: i64,
    pub gateway_type: String,
    pub name: Option<String>,
    pub active: bool,
    pub preferences: BTreeMap<String, PreferenceValue>,
}

/// StorageError represents errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The schema object the query needs has not been created yet.
    #[error("relation does not exist: {0}")]
    MissingRelation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl StorageError {
    pub fn is_missing_relation(&self) -> bool {
        matches!(self, StorageError::MissingRelation(_))
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let message = db.message();
            let undefined_table = db.code().as_deref() == Some(UNDEFINED_TABLE_SQLSTATE);
            if undefined_table || is_missing_relation_message(message) {
                return StorageError::MissingRelation(message.to_string());
            }
        }
        StorageError::Database(err)
    }
}

/// Matches the messages SQLite and PostgreSQL use for a missing table.
fn is_missing_relation_message(message: &str) -> bool {
    message.contains("no such table")
        || (message.contains("relation") && message.contains("does not exist"))
}
