//! Applies settings sections to existing payment gateway records.

use tracing::{debug, error, info, warn};

use crate::gateway::{Gateway, GatewayRegistry};
use crate::initializer::{ApplyError, ApplySummary, GATEWAY_CLASS, GATEWAY_ID, GATEWAY_NAME};
use crate::preference::PreferenceTarget;
use crate::reporter::{ErrorReport, ErrorReporter};
use crate::settings::{Section, SettingsDocument};
use crate::storage::{GatewayStore, StorageError};
use crate::warnings::Warnings;

/// Keys that identify the gateway rather than assign a preference.
const IDENTIFYING_KEYS: [&str; 3] = [GATEWAY_CLASS, GATEWAY_ID, GATEWAY_NAME];

/// Writes `gateway_class` sections into gateway record preferences.
pub struct GatewayApplier<'a> {
    registry: &'a GatewayRegistry,
    store: &'a dyn GatewayStore,
    reporter: Option<&'a dyn ErrorReporter>,
    verify_schema: bool,
}

impl<'a> GatewayApplier<'a> {
    pub fn new(registry: &'a GatewayRegistry, store: &'a dyn GatewayStore) -> Self {
        Self {
            registry,
            store,
            reporter: None,
            verify_schema: false,
        }
    }

    /// Forwards swallowed storage errors to `reporter`.
    pub fn with_reporter(mut self, reporter: Option<&'a dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// When set, a missing table is returned as an error instead of being
    /// recorded as a warning.
    pub fn verify_schema(mut self, verify: bool) -> Self {
        self.verify_schema = verify;
        self
    }

    /// Applies every section of `environment` in file order.
    ///
    /// A section whose record does not exist is skipped. A section that hits a
    /// missing table is skipped with a warning unless schema verification is
    /// on. Every other failure is returned.
    pub async fn apply_gateways(
        &self,
        environment: &str,
        document: &SettingsDocument,
        warnings: &mut Warnings,
    ) -> Result<ApplySummary, ApplyError> {
        let settings = document.environment(environment)?;
        let mut summary = ApplySummary::default();

        for section in settings.sections() {
            match self.apply_section(section, warnings).await {
                Ok(Some(written)) => {
                    summary.sections_applied += 1;
                    summary.preferences_written += written;
                }
                Ok(None) => summary.sections_skipped += 1,
                Err(ApplyError::Storage(err)) if err.is_missing_relation() && !self.verify_schema => {
                    warn!(section = %section.name(), error = %err, "Gateway storage not provisioned");
                    self.report(environment, section, &err).await;
                    warnings.push(err.to_string());
                    summary.sections_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            environment = %environment,
            applied = summary.sections_applied,
            skipped = summary.sections_skipped,
            written = summary.preferences_written,
            "Gateway preferences applied"
        );
        Ok(summary)
    }

    /// Returns the number of preferences written, or `None` when no record matched.
    async fn apply_section(
        &self,
        section: &Section,
        warnings: &mut Warnings,
    ) -> Result<Option<usize>, ApplyError> {
        let Some(mut gateway) = self.find_gateway(section).await? else {
            debug!(section = %section.name(), "No gateway record matched, skipping section");
            return Ok(None);
        };

        let mut written = 0;
        for (key, value) in section.entries() {
            if IDENTIFYING_KEYS.contains(&key) {
                continue;
            }

            if !gateway.has_preference(key) {
                warnings.push(format!("{} is not a preference on {}", key, gateway));
                continue;
            }

            let desired = gateway
                .preferences()
                .coerce(key, value.clone())
                .map_err(ApplyError::preference(section.name()))?;

            if gateway.get_preference(key) == Some(&desired) {
                continue;
            }

            debug!(
                gateway = %gateway,
                key = %key,
                value = %gateway.preferences().display_value(key, &desired),
                "Setting gateway preference"
            );

            gateway
                .set_preference(key, desired)
                .map_err(ApplyError::preference(section.name()))?;
            gateway.save(self.store).await?;
            written += 1;
        }

        Ok(Some(written))
    }

    /// Resolves the section's record by id when given, otherwise by name.
    async fn find_gateway(&self, section: &Section) -> Result<Option<Gateway>, ApplyError> {
        let class = self.registry.resolve(section.require_str(GATEWAY_CLASS)?)?;

        let gateway = match section.optional_i64(GATEWAY_ID)? {
            Some(id) => class.find_by_id(self.store, id).await?,
            None => {
                let name = section.optional_str(GATEWAY_NAME)?;
                class.find_by_name(self.store, name).await?
            }
        };

        Ok(gateway)
    }

    async fn report(&self, environment: &str, section: &Section, err: &StorageError) {
        let Some(reporter) = self.reporter else {
            return;
        };

        let report = ErrorReport::new(
            format!("gateways.{}", section.name()),
            err.to_string(),
            environment,
        );
        if let Err(e) = reporter.report(&report).await {
            error!(error = %e, "Failed to report storage error");
        }
    }
}
