use std::time::Duration;

use crate::reporter::{ErrorReport, ErrorReporter, ReportError};

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const NOTIFIER_NAME: &str = "preference-initializer";

/// Webhook reporter configuration.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Collector endpoint that accepts JSON reports.
    pub endpoint: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl WebhookConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.timeout = timeout;
        }
        self
    }
}

/// Posts error reports as JSON to an HTTP collector.
pub struct WebhookReporter {
    config: WebhookConfig,
    http_client: reqwest::Client,
}

impl WebhookReporter {
    pub fn new(config: WebhookConfig) -> Result<Self, ReportError> {
        if config.endpoint.is_empty() {
            return Err(ReportError::Config("endpoint is required".into()));
        }
        if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://") {
            return Err(ReportError::Config(format!(
                "endpoint must be an http(s) URL, got {}",
                config.endpoint
            )));
        }

        let http_client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

/// Builds the JSON body sent to the collector.
pub(crate) fn build_payload(report: &ErrorReport) -> serde_json::Value {
    serde_json::json!({
        "notifier": { "name": NOTIFIER_NAME, "version": env!("CARGO_PKG_VERSION") },
        "error": { "message": report.message },
        "context": {
            "component": report.component,
            "environment": report.environment,
        },
        "occurred_at": report.occurred_at.to_rfc3339(),
    })
}

#[async_trait::async_trait]
impl ErrorReporter for WebhookReporter {
    async fn report(&self, report: &ErrorReport) -> Result<(), ReportError> {
        let mut request = self
            .http_client
            .post(&self.config.endpoint)
            .json(&build_payload(report));

        if let Some(ref api_key) = self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ReportError::Rejected { status, body });
        }

        Ok(())
    }
}
