//! External error reporting for swallowed storage errors.

mod webhook;

pub use webhook::{WebhookConfig, WebhookReporter};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// A single error forwarded to an external collector.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    /// Where the error was caught, e.g. `gateways.braintree`.
    pub component: String,
    pub message: String,
    pub environment: String,
    pub occurred_at: DateTime<Utc>,
}

impl ErrorReport {
    pub fn new(
        component: impl Into<String>,
        message: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            component: component.into(),
            message: message.into(),
            environment: environment.into(),
            occurred_at: Utc::now(),
        }
    }
}

/// Trait for sending error reports.
#[async_trait::async_trait]
pub trait ErrorReporter: Send + Sync {
    async fn report(&self, report: &ErrorReport) -> Result<(), ReportError>;
}

/// Error reporting failure.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid reporter config: {0}")]
    Config(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("collector rejected report: {status} - {body}")]
    Rejected { status: u16, body: String },
}

#[cfg(test)]
mod tests;
