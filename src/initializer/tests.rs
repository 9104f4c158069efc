//! Tests for the configuration and gateway appliers.

use super::*;
use crate::preference::{
    PreferenceDefinition, PreferenceTarget, PreferenceType, Preferences, Validatable,
};
use crate::registry::RegistryError;
use crate::reporter::{ErrorReport, ReportError};
use crate::settings::SettingsError;
use crate::storage::{GatewayRow, SqliteStorage, SqliteStorageConfig, StorageError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Mutex;
use tempfile::{NamedTempFile, TempDir};

// ==================== Test configuration classes ====================

#[derive(Debug)]
struct GoodConfiguration {
    preferences: Preferences,
}

impl GoodConfiguration {
    fn factory() -> Result<Box<dyn Configuration>, String> {
        Ok(Box::new(Self {
            preferences: Preferences::new(vec![PreferenceDefinition::new(
                "foo",
                PreferenceType::String,
            )]),
        }))
    }
}

impl PreferenceTarget for GoodConfiguration {
    fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }
}

impl Configuration for GoodConfiguration {
    fn class_name(&self) -> &str {
        "GoodConfiguration"
    }
}

#[derive(Debug)]
struct BadConfiguration {
    preferences: Preferences,
}

impl BadConfiguration {
    fn factory() -> Result<Box<dyn Configuration>, String> {
        Ok(Box::new(Self {
            preferences: Preferences::default(),
        }))
    }
}

impl PreferenceTarget for BadConfiguration {
    fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }
}

impl Configuration for BadConfiguration {
    fn class_name(&self) -> &str {
        "BadConfiguration"
    }
}

/// Requires `something` to be present.
#[derive(Debug)]
struct AnotherBadConfiguration {
    preferences: Preferences,
}

impl AnotherBadConfiguration {
    fn factory() -> Result<Box<dyn Configuration>, String> {
        Ok(Box::new(Self {
            preferences: Preferences::new(vec![
                PreferenceDefinition::new("something", PreferenceType::String),
                PreferenceDefinition::new("other", PreferenceType::Integer),
            ]),
        }))
    }
}

impl PreferenceTarget for AnotherBadConfiguration {
    fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }
}

impl Validatable for AnotherBadConfiguration {
    fn validate(&self) -> Result<(), Vec<String>> {
        match self.get_preference("something") {
            Some(v) if !v.is_blank() => Ok(()),
            _ => Err(vec!["something can't be blank".to_string()]),
        }
    }
}

impl Configuration for AnotherBadConfiguration {
    fn class_name(&self) -> &str {
        "AnotherBadConfiguration"
    }

    fn validation(&self) -> Option<&dyn Validatable> {
        Some(self)
    }
}

fn test_registry() -> ConfigurationRegistry {
    let mut registry = ConfigurationRegistry::with_defaults();
    registry.register("GoodConfiguration", GoodConfiguration::factory);
    registry.register("BadConfiguration", BadConfiguration::factory);
    registry.register("AnotherBadConfiguration", AnotherBadConfiguration::factory);
    registry
}

// ==================== Test collaborators ====================

#[derive(Default)]
struct RecordingReporter {
    reports: Mutex<Vec<ErrorReport>>,
}

#[async_trait]
impl ErrorReporter for RecordingReporter {
    async fn report(&self, report: &ErrorReport) -> Result<(), ReportError> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}

struct FailingReporter;

#[async_trait]
impl ErrorReporter for FailingReporter {
    async fn report(&self, _report: &ErrorReport) -> Result<(), ReportError> {
        Err(ReportError::Config("collector unavailable".into()))
    }
}

/// Gateway store whose lookups fail with a non-schema error.
struct CorruptGatewayStore;

#[async_trait]
impl GatewayStore for CorruptGatewayStore {
    async fn find_gateway_by_id(
        &self,
        _gateway_type: &str,
        id: i64,
    ) -> Result<Option<GatewayRow>, StorageError> {
        Err(StorageError::InvalidData(format!("corrupt gateway {}", id)))
    }

    async fn find_gateway_by_name(
        &self,
        _gateway_type: &str,
        _name: Option<&str>,
    ) -> Result<Option<GatewayRow>, StorageError> {
        Err(StorageError::InvalidData("corrupt gateway".into()))
    }

    async fn save_gateway_preferences(
        &self,
        _id: i64,
        _preferences: &BTreeMap<String, PreferenceValue>,
    ) -> Result<(), StorageError> {
        Ok(())
    }

    async fn insert_gateway(
        &self,
        _gateway_type: &str,
        _name: Option<&str>,
    ) -> Result<i64, StorageError> {
        Ok(1)
    }

    async fn count_gateways(&self) -> Result<i64, StorageError> {
        Ok(0)
    }
}

// ==================== Helpers ====================

fn write_yaml(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

fn storage_config(dir: &TempDir) -> SqliteStorageConfig {
    SqliteStorageConfig {
        path: dir.path().join("initializer.db").to_string_lossy().into_owned(),
        max_connections: 1,
    }
}

async fn migrated(dir: &TempDir) -> Arc<SqliteStorage> {
    Arc::new(SqliteStorage::new(storage_config(dir)).await.unwrap())
}

async fn unmigrated(dir: &TempDir) -> Arc<SqliteStorage> {
    Arc::new(SqliteStorage::connect(storage_config(dir)).await.unwrap())
}

fn initializer(storage: Arc<SqliteStorage>) -> PreferenceInitializer {
    PreferenceInitializer::new("test", storage.clone(), storage)
        .with_configurations(test_registry())
        .verify_schema(false)
}

const GATEWAYS_BY_ID: &str = r#"
test:
  braintree:
    gateway_class: BraintreeGateway
    gateway_id: 1
    merchant_id: merchant
    merchant_account_id: account
    public_key: public
    private_key: private
    client_side_encryption_key: MIIBCgKCAQEA
    environment: sandbox_test
"#;

const GATEWAYS_BY_NAME: &str = r#"
test:
  braintree:
    gateway_class: BraintreeGateway
    gateway_name: Test Credit Card
    merchant_id: merchant
    merchant_account_id: account
    public_key: public
    private_key: private
    client_side_encryption_key: MIIBCgKCAQEA
    environment: sandbox_test
"#;

const BRAINTREE_KEYS: [&str; 6] = [
    "merchant_id",
    "merchant_account_id",
    "public_key",
    "private_key",
    "client_side_encryption_key",
    "environment",
];

// ==================== load_config_property ====================

#[tokio::test]
async fn test_load_config_property_returns_value() {
    let dir = TempDir::new().unwrap();
    let init = initializer(migrated(&dir).await);
    let file = write_yaml(
        r#"
test:
  backend_configuration:
    config_class: GoodConfiguration
    foo: bar
"#,
    );

    let value = init
        .load_config_property("backend_configuration", "foo", file.path())
        .unwrap();
    assert_eq!(value, PreferenceValue::from("bar"));
}

#[tokio::test]
async fn test_load_config_property_missing_key() {
    let dir = TempDir::new().unwrap();
    let init = initializer(migrated(&dir).await);
    let file = write_yaml("test:\n  store:\n    config_class: GoodConfiguration\n");

    let err = init.load_config_property("store", "foo", file.path()).unwrap_err();
    assert!(matches!(err, ApplyError::Settings(SettingsError::MissingKey { .. })));
}

// ==================== load_configs ====================

#[tokio::test]
async fn test_load_configs_sets_foo() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(migrated(&dir).await);
    let file = write_yaml("test:\n  foo:\n    config_class: GoodConfiguration\n    foo: bar\n");

    let summary = init.load_configs(file.path()).await.unwrap();
    assert_eq!(summary.sections_applied, 1);
    assert_eq!(summary.preferences_written, 1);
    assert!(init.warnings().is_empty());

    let config = init.configuration("GoodConfiguration").await.unwrap();
    assert_eq!(config.get_preference("foo"), Some(&PreferenceValue::from("bar")));
}

#[tokio::test]
async fn test_load_configs_missing_preference_warns() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(migrated(&dir).await);
    let file = write_yaml("test:\n  bad:\n    config_class: BadConfiguration\n    something: x\n");

    let result = init.load_configs(file.path()).await;
    assert!(result.is_ok());
    assert_eq!(
        init.warnings(),
        ["something is not a preference on BadConfiguration"]
    );
}

#[tokio::test]
async fn test_load_configs_one_warning_per_unknown_key() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(migrated(&dir).await);
    let file = write_yaml(
        r#"
test:
  good:
    config_class: GoodConfiguration
    foo: bar
    color: red
    size: 3
  bad:
    config_class: BadConfiguration
    something: x
"#,
    );

    init.load_configs(file.path()).await.unwrap();
    assert_eq!(init.warnings().len(), 3);
    assert!(init.warnings()[0].starts_with("color is not a preference on GoodConfiguration"));
}

#[tokio::test]
async fn test_load_configs_invalid_configuration_raises() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(migrated(&dir).await);
    let file = write_yaml(
        "test:\n  another:\n    config_class: AnotherBadConfiguration\n    other: 5\n",
    );

    let err = init.load_configs(file.path()).await.unwrap_err();
    assert!(matches!(err, ApplyError::Invalid { .. }));
    let message = err.to_string();
    assert!(message.contains("AnotherBadConfiguration"));
    assert!(message.contains("something can't be blank"));
}

#[tokio::test]
async fn test_load_configs_validates_each_section() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(migrated(&dir).await);
    let file = write_yaml(
        r#"
test:
  good:
    config_class: GoodConfiguration
    foo: first
  another:
    config_class: AnotherBadConfiguration
  after:
    config_class: BackendConfiguration
    locale: de
"#,
    );

    let err = init.load_configs(file.path()).await.unwrap_err();
    assert!(err.to_string().contains("AnotherBadConfiguration"));

    let good = init.configuration("GoodConfiguration").await.unwrap();
    assert_eq!(good.get_preference("foo"), Some(&PreferenceValue::from("first")));

    let backend = init.configuration("BackendConfiguration").await.unwrap();
    assert_eq!(backend.get_preference("locale"), Some(&PreferenceValue::from("en")));
}

#[tokio::test]
async fn test_load_configs_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(migrated(&dir).await);
    let file = write_yaml(
        r#"
test:
  store:
    config_class: AppConfiguration
    site_name: Example Store
    currency: EUR
    orders_per_page: "30"
    allow_guest_checkout: false
"#,
    );

    let first = init.load_configs(file.path()).await.unwrap();
    assert_eq!(first.preferences_written, 4);

    let second = init.load_configs(file.path()).await.unwrap();
    assert_eq!(second.preferences_written, 0);
    assert_eq!(second.sections_applied, 1);
    assert!(init.warnings().is_empty());

    let store = init.configuration("AppConfiguration").await.unwrap();
    assert_eq!(store.get_preference("orders_per_page"), Some(&PreferenceValue::Integer(30)));
    assert_eq!(
        store.get_preference("allow_guest_checkout"),
        Some(&PreferenceValue::Boolean(false))
    );
}

#[tokio::test]
async fn test_load_configs_value_equal_to_default_is_not_written() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(migrated(&dir).await);
    let file = write_yaml("test:\n  backend:\n    config_class: BackendConfiguration\n    locale: en\n");

    let summary = init.load_configs(file.path()).await.unwrap();
    assert_eq!(summary.preferences_written, 0);
}

#[tokio::test]
async fn test_load_configs_malformed_raises() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(migrated(&dir).await);
    let file = write_yaml("test:\n  store: [not, a, mapping\n");

    let err = init.load_configs(file.path()).await.unwrap_err();
    assert!(matches!(err, ApplyError::Settings(_)));
}

#[tokio::test]
async fn test_load_configs_missing_environment() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(migrated(&dir).await);
    let file = write_yaml("production:\n  foo:\n    config_class: GoodConfiguration\n");

    let err = init.load_configs(file.path()).await.unwrap_err();
    assert!(matches!(
        err,
        ApplyError::Settings(SettingsError::MissingEnvironment(ref env)) if env == "test"
    ));
}

#[tokio::test]
async fn test_load_configs_unknown_class() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(migrated(&dir).await);
    let file = write_yaml("test:\n  foo:\n    config_class: MissingConfiguration\n    foo: bar\n");

    let err = init.load_configs(file.path()).await.unwrap_err();
    assert!(matches!(err, ApplyError::Registry(RegistryError::UnknownClass(_))));
}

#[tokio::test]
async fn test_load_configs_section_without_class() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(migrated(&dir).await);
    let file = write_yaml("test:\n  foo:\n    foo: bar\n");

    let err = init.load_configs(file.path()).await.unwrap_err();
    assert_eq!(err.to_string(), "section foo is missing config_class");
}

#[tokio::test]
async fn test_load_configs_type_mismatch_raises() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(migrated(&dir).await);
    let file = write_yaml(
        "test:\n  backend:\n    config_class: BackendConfiguration\n    admin_orders_per_page: lots\n",
    );

    let err = init.load_configs(file.path()).await.unwrap_err();
    assert!(matches!(err, ApplyError::Preference { ref section, .. } if section == "backend"));
}

#[tokio::test]
async fn test_load_configs_unmigrated_database_raises() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(unmigrated(&dir).await);
    let file = write_yaml("test:\n  foo:\n    config_class: GoodConfiguration\n    foo: bar\n");

    let err = init.load_configs(file.path()).await.unwrap_err();
    assert!(err.is_missing_relation());
    assert!(init.warnings().is_empty());
}

// ==================== load_gateways ====================

#[tokio::test]
async fn test_load_gateways_by_id() {
    let dir = TempDir::new().unwrap();
    let storage = migrated(&dir).await;
    storage
        .insert_gateway("BraintreeGateway", Some("Braintree Credit Card"))
        .await
        .unwrap();
    let mut init = initializer(storage.clone());
    let file = write_yaml(GATEWAYS_BY_ID);

    let summary = init.load_gateways(file.path()).await.unwrap();
    assert_eq!(summary.sections_applied, 1);
    assert_eq!(summary.preferences_written, 6);
    assert!(init.warnings().is_empty());

    let row = storage.find_gateway_by_id("BraintreeGateway", 1).await.unwrap().unwrap();
    for key in BRAINTREE_KEYS {
        assert!(
            row.preferences.get(key).is_some_and(|v| !v.is_null()),
            "expected {} to be set",
            key
        );
    }
    assert_eq!(row.preferences["environment"], PreferenceValue::from("sandbox_test"));
}

#[tokio::test]
async fn test_load_gateways_by_name() {
    let dir = TempDir::new().unwrap();
    let storage = migrated(&dir).await;
    storage
        .insert_gateway("BraintreeGateway", Some("Test Credit Card"))
        .await
        .unwrap();
    let mut init = initializer(storage.clone());
    let file = write_yaml(GATEWAYS_BY_NAME);

    init.load_gateways(file.path()).await.unwrap();

    let row = storage
        .find_gateway_by_name("BraintreeGateway", Some("Test Credit Card"))
        .await
        .unwrap()
        .unwrap();
    for key in BRAINTREE_KEYS {
        assert!(row.preferences.contains_key(key), "expected {} to be set", key);
    }
}

#[tokio::test]
async fn test_load_gateways_keeps_undeclared_stored_keys() {
    let dir = TempDir::new().unwrap();
    let storage = migrated(&dir).await;
    let id = storage
        .insert_gateway("BraintreeGateway", Some("Braintree Credit Card"))
        .await
        .unwrap();
    let mut seeded = BTreeMap::new();
    seeded.insert("legacy_option".to_string(), PreferenceValue::from("keep-me"));
    storage.save_gateway_preferences(id, &seeded).await.unwrap();
    let mut init = initializer(storage.clone());
    let file = write_yaml(GATEWAYS_BY_ID);

    let summary = init.load_gateways(file.path()).await.unwrap();
    assert_eq!(summary.preferences_written, 6);

    let row = storage.find_gateway_by_id("BraintreeGateway", id).await.unwrap().unwrap();
    assert_eq!(
        row.preferences.get("legacy_option"),
        Some(&PreferenceValue::from("keep-me"))
    );
    assert_eq!(row.preferences["merchant_id"], PreferenceValue::from("merchant"));
}

#[tokio::test]
async fn test_load_gateways_without_identifier_matches_unnamed_record() {
    let dir = TempDir::new().unwrap();
    let storage = migrated(&dir).await;
    storage.insert_gateway("BogusGateway", Some("Named")).await.unwrap();
    let unnamed = storage.insert_gateway("BogusGateway", None).await.unwrap();
    let mut init = initializer(storage.clone());
    let file = write_yaml(
        r#"
test:
  bogus:
    gateway_class: BogusGateway
    dummy_key: UNNAMED
"#,
    );

    let summary = init.load_gateways(file.path()).await.unwrap();
    assert_eq!(summary.sections_applied, 1);
    assert_eq!(summary.preferences_written, 1);

    let row = storage.find_gateway_by_id("BogusGateway", unnamed).await.unwrap().unwrap();
    assert_eq!(row.preferences["dummy_key"], PreferenceValue::from("UNNAMED"));

    let named = storage
        .find_gateway_by_name("BogusGateway", Some("Named"))
        .await
        .unwrap()
        .unwrap();
    assert!(named.preferences.get("dummy_key").is_none());
}

#[tokio::test]
async fn test_load_gateways_id_takes_precedence_over_name() {
    let dir = TempDir::new().unwrap();
    let storage = migrated(&dir).await;
    let by_id = storage.insert_gateway("BogusGateway", Some("First")).await.unwrap();
    let by_name = storage.insert_gateway("BogusGateway", Some("Second")).await.unwrap();
    let mut init = initializer(storage.clone());
    let file = write_yaml(&format!(
        r#"
test:
  bogus:
    gateway_class: BogusGateway
    gateway_id: {}
    gateway_name: Second
    dummy_key: BY_ID
"#,
        by_id
    ));

    let summary = init.load_gateways(file.path()).await.unwrap();
    assert_eq!(summary.sections_applied, 1);

    let first = storage.find_gateway_by_id("BogusGateway", by_id).await.unwrap().unwrap();
    assert_eq!(first.preferences["dummy_key"], PreferenceValue::from("BY_ID"));

    let second = storage.find_gateway_by_id("BogusGateway", by_name).await.unwrap().unwrap();
    assert!(second.preferences.get("dummy_key").is_none());
}

#[tokio::test]
async fn test_load_gateways_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let storage = migrated(&dir).await;
    storage.insert_gateway("BraintreeGateway", None).await.unwrap();
    let mut init = initializer(storage);
    let file = write_yaml(GATEWAYS_BY_ID);

    init.load_gateways(file.path()).await.unwrap();
    let second = init.load_gateways(file.path()).await.unwrap();

    assert_eq!(second.preferences_written, 0);
    assert!(init.warnings().is_empty());
}

#[tokio::test]
async fn test_load_gateways_without_matching_record() {
    let dir = TempDir::new().unwrap();
    let storage = migrated(&dir).await;
    storage.insert_gateway("BraintreeGateway", Some("Other")).await.unwrap();
    let mut init = initializer(storage.clone());
    let file = write_yaml(GATEWAYS_BY_NAME);

    let summary = init.load_gateways(file.path()).await.unwrap();
    assert_eq!(summary.sections_skipped, 1);
    assert_eq!(summary.preferences_written, 0);
    assert!(init.warnings().is_empty());

    let row = storage.find_gateway_by_id("BraintreeGateway", 1).await.unwrap().unwrap();
    assert!(row.preferences.is_empty());
    assert_eq!(storage.count_gateways().await.unwrap(), 1);
}

#[tokio::test]
async fn test_load_gateways_record_of_other_type_is_not_matched() {
    let dir = TempDir::new().unwrap();
    let storage = migrated(&dir).await;
    storage.insert_gateway("StripeGateway", None).await.unwrap();
    let mut init = initializer(storage);
    let file = write_yaml(GATEWAYS_BY_ID);

    let summary = init.load_gateways(file.path()).await.unwrap();
    assert_eq!(summary.sections_skipped, 1);
}

#[tokio::test]
async fn test_load_gateways_unknown_preference_warns() {
    let dir = TempDir::new().unwrap();
    let storage = migrated(&dir).await;
    storage.insert_gateway("BogusGateway", Some("Bogus")).await.unwrap();
    let mut init = initializer(storage);
    let file = write_yaml(
        r#"
test:
  bogus:
    gateway_class: BogusGateway
    gateway_id: "1"
    test_mode: false
    server: test
"#,
    );

    let summary = init.load_gateways(file.path()).await.unwrap();
    assert_eq!(summary.preferences_written, 1);
    assert_eq!(
        init.warnings(),
        ["server is not a preference on BogusGateway#1 (Bogus)"]
    );
}

#[tokio::test]
async fn test_load_gateways_missing_table_warns() {
    let dir = TempDir::new().unwrap();
    let reporter = Arc::new(RecordingReporter::default());
    let mut init = initializer(unmigrated(&dir).await).with_reporter(reporter.clone());
    let file = write_yaml(GATEWAYS_BY_ID);

    let summary = init.load_gateways(file.path()).await.unwrap();
    assert_eq!(summary.sections_skipped, 1);
    assert_eq!(init.warnings().len(), 1);
    assert!(init.warnings()[0].contains("no such table"));

    let reports = reporter.reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].component, "gateways.braintree");
    assert_eq!(reports[0].environment, "test");
}

#[tokio::test]
async fn test_load_gateways_missing_table_continues_with_next_section() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(unmigrated(&dir).await);
    let file = write_yaml(
        r#"
test:
  braintree:
    gateway_class: BraintreeGateway
    gateway_id: 1
  stripe:
    gateway_class: StripeGateway
    gateway_name: Stripe
"#,
    );

    let summary = init.load_gateways(file.path()).await.unwrap();
    assert_eq!(summary.sections_skipped, 2);
    assert_eq!(init.warnings().len(), 2);
}

#[tokio::test]
async fn test_load_gateways_missing_table_raises_when_verifying() {
    let dir = TempDir::new().unwrap();
    let reporter = Arc::new(RecordingReporter::default());
    let mut init = initializer(unmigrated(&dir).await)
        .with_reporter(reporter.clone())
        .verify_schema(true);
    let file = write_yaml(GATEWAYS_BY_ID);

    let err = init.load_gateways(file.path()).await.unwrap_err();
    assert!(err.is_missing_relation());
    assert!(init.warnings().is_empty());
    assert!(reporter.reports.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_test_environment_verifies_schema_by_default() {
    let dir = TempDir::new().unwrap();
    let storage = unmigrated(&dir).await;
    let mut init = PreferenceInitializer::new("test", storage.clone(), storage);
    let file = write_yaml(GATEWAYS_BY_ID);

    assert!(init.load_gateways(file.path()).await.is_err());
}

#[tokio::test]
async fn test_load_gateways_reporter_failure_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(unmigrated(&dir).await).with_reporter(Arc::new(FailingReporter));
    let file = write_yaml(GATEWAYS_BY_ID);

    assert!(init.load_gateways(file.path()).await.is_ok());
    assert_eq!(init.warnings().len(), 1);
}

#[tokio::test]
async fn test_load_gateways_other_storage_errors_propagate() {
    let registry = GatewayRegistry::with_defaults();
    let store = CorruptGatewayStore;
    let document = SettingsDocument::from_yaml(GATEWAYS_BY_ID).unwrap();
    let mut warnings = Warnings::new();

    let err = GatewayApplier::new(&registry, &store)
        .apply_gateways("test", &document, &mut warnings)
        .await
        .unwrap_err();

    assert!(matches!(err, ApplyError::Storage(StorageError::InvalidData(_))));
    assert!(warnings.is_empty());
}

#[tokio::test]
async fn test_load_gateways_malformed_raises() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(unmigrated(&dir).await);
    let file = write_yaml("test:\n  braintree: {gateway_class: BraintreeGateway\n");

    let err = init.load_gateways(file.path()).await.unwrap_err();
    assert!(matches!(err, ApplyError::Settings(SettingsError::Parse(_))));
}

#[tokio::test]
async fn test_load_gateways_unknown_class_raises() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(migrated(&dir).await);
    let file = write_yaml("test:\n  pp:\n    gateway_class: PaypalGateway\n    gateway_id: 1\n");

    let err = init.load_gateways(file.path()).await.unwrap_err();
    assert_eq!(err.to_string(), "unknown class PaypalGateway");
}

#[tokio::test]
async fn test_load_gateways_invalid_id_raises() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(migrated(&dir).await);
    let file = write_yaml(
        "test:\n  braintree:\n    gateway_class: BraintreeGateway\n    gateway_id: first\n",
    );

    let err = init.load_gateways(file.path()).await.unwrap_err();
    assert!(matches!(err, ApplyError::Settings(SettingsError::InvalidValue { .. })));
}

// ==================== Warnings lifecycle ====================

#[tokio::test]
async fn test_warnings_accumulate_until_reset() {
    let dir = TempDir::new().unwrap();
    let mut init = initializer(migrated(&dir).await);
    let file = write_yaml("test:\n  bad:\n    config_class: BadConfiguration\n    something: x\n");

    init.load_configs(file.path()).await.unwrap();
    init.load_configs(file.path()).await.unwrap();
    assert_eq!(init.warnings().len(), 2);

    init.reset();
    assert!(init.warnings().is_empty());
}
