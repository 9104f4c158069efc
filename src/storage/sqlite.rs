//! SQLite implementation of PreferenceStore and GatewayStore.

use crate::preference::PreferenceValue;
use crate::storage::{GatewayRow, GatewayStore, PreferenceStore, StorageError};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, info};

/// SqliteStorage implements both stores on top of one SQLite database.
pub struct SqliteStorage {
    pool: Pool<Sqlite>,
}

/// SqliteStorageConfig holds SQLite storage configuration.
#[derive(Debug, Clone)]
pub struct SqliteStorageConfig {
    /// Path to the SQLite database file.
    pub path: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
}

impl Default for SqliteStorageConfig {
    fn default() -> Self {
        Self {
            path: "preferences.db".to_string(),
            max_connections: 5,
        }
    }
}

impl SqliteStorage {
    /// Opens the database without touching its schema.
    ///
    /// Queries against tables that were never created fail with
    /// `StorageError::MissingRelation`.
    pub async fn connect(config: SqliteStorageConfig) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", config.path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        debug!(path = %config.path, "SQLite storage connected");
        Ok(Self { pool })
    }

    /// Opens the database and creates the schema.
    pub async fn new(config: SqliteStorageConfig) -> Result<Self, StorageError> {
        let path = config.path.clone();
        let storage = Self::connect(config).await?;

        storage.migrate().await?;

        info!(path = %path, "SQLite storage initialized");
        Ok(storage)
    }

    /// Runs database migrations to create the schema.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS preferences (
                scope TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (scope, key)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS gateways (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL,
                name TEXT,
                active INTEGER NOT NULL DEFAULT 1,
                preferences TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_gateways_type_name ON gateways(type, name)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl PreferenceStore for SqliteStorage {
    async fn load_preferences(
        &self,
        scope: &str,
    ) -> Result<BTreeMap<String, PreferenceValue>, StorageError> {
        let rows = sqlx::query("SELECT key, value FROM preferences WHERE scope = ?")
            .bind(scope)
            .fetch_all(&self.pool)
            .await?;

        let mut values = BTreeMap::new();
        for row in rows {
            let key: String = row.try_get("key")?;
            let raw: String = row.try_get("value")?;
            let value = serde_json::from_str(&raw).map_err(|e| {
                StorageError::InvalidData(format!("Invalid value for {}/{}: {}", scope, key, e))
            })?;
            values.insert(key, value);
        }

        Ok(values)
    }

    async fn save_preference(
        &self,
        scope: &str,
        key: &str,
        value: &PreferenceValue,
    ) -> Result<(), StorageError> {
        let raw = encode_json(value)?;

        sqlx::query(
            r#"
            INSERT INTO preferences (scope, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(scope, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(scope)
        .bind(key)
        .bind(&raw)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(scope = %scope, key = %key, "Preference saved");
        Ok(())
    }
}

#[async_trait]
impl GatewayStore for SqliteStorage {
    async fn find_gateway_by_id(
        &self,
        gateway_type: &str,
        id: i64,
    ) -> Result<Option<GatewayRow>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT id, type, name, active, preferences
            FROM gateways WHERE type = ? AND id = ?
            "#,
        )
        .bind(gateway_type)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(parse_gateway_row).transpose()
    }

    async fn find_gateway_by_name(
        &self,
        gateway_type: &str,
        name: Option<&str>,
    ) -> Result<Option<GatewayRow>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT id, type, name, active, preferences
            FROM gateways WHERE type = ? AND name IS ? ORDER BY id LIMIT 1
            "#,
        )
        .bind(gateway_type)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(parse_gateway_row).transpose()
    }

    async fn save_gateway_preferences(
        &self,
        id: i64,
        preferences: &BTreeMap<String, PreferenceValue>,
    ) -> Result<(), StorageError> {
        let raw = encode_json(preferences)?;

        let result = sqlx::query("UPDATE gateways SET preferences = ?, updated_at = ? WHERE id = ?")
            .bind(&raw)
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("gateway {}", id)));
        }

        debug!(id = id, "Gateway preferences saved");
        Ok(())
    }

    async fn insert_gateway(
        &self,
        gateway_type: &str,
        name: Option<&str>,
    ) -> Result<i64, StorageError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO gateways (type, name, active, preferences, created_at, updated_at)
            VALUES (?1, ?2, 1, '{}', ?3, ?3)
            "#,
        )
        .bind(gateway_type)
        .bind(name)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn count_gateways(&self) -> Result<i64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM gateways")
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count)
    }
}

fn encode_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::InvalidData(e.to_string()))
}

/// Parses a gateway from a database row.
fn parse_gateway_row(row: &SqliteRow) -> Result<GatewayRow, StorageError> {
    let id: i64 = row.try_get("id")?;
    let raw: String = row.try_get("preferences")?;
    let preferences = serde_json::from_str(&raw).map_err(|e| {
        StorageError::InvalidData(format!("Invalid preferences for gateway {}: {}", id, e))
    })?;

    Ok(GatewayRow {
        id,
        gateway_type: row.try_get("type")?,
        name: row.try_get("name")?,
        active: row.try_get("active")?,
        preferences,
    })
}
