//! Tests for error reports and the webhook reporter.

use super::webhook::build_payload;
use super::*;
use std::time::Duration;

#[test]
fn test_payload_fields() {
    let report = ErrorReport::new("gateways.braintree", "no such table: gateways", "production");
    let payload = build_payload(&report);

    assert_eq!(payload["error"]["message"], "no such table: gateways");
    assert_eq!(payload["context"]["component"], "gateways.braintree");
    assert_eq!(payload["context"]["environment"], "production");
    assert_eq!(payload["notifier"]["name"], "preference-initializer");
    assert!(payload["occurred_at"].as_str().is_some());
}

#[test]
fn test_webhook_requires_endpoint() {
    let result = WebhookReporter::new(WebhookConfig::new(""));
    assert!(matches!(result, Err(ReportError::Config(_))));
}

#[test]
fn test_webhook_rejects_non_http_endpoint() {
    let result = WebhookReporter::new(WebhookConfig::new("ftp://collector"));
    let err = result.err().unwrap();
    assert!(err.to_string().contains("must be an http(s) URL"));
}

#[test]
fn test_webhook_config_builders() {
    let config = WebhookConfig::new("https://errors.example.com/api/v1/notices")
        .with_api_key("secret")
        .with_timeout(Duration::ZERO);

    assert_eq!(config.api_key.as_deref(), Some("secret"));
    assert_eq!(config.timeout, Duration::from_secs(10));

    let reporter = WebhookReporter::new(config.with_timeout(Duration::from_secs(2))).unwrap();
    assert_eq!(reporter.endpoint(), "https://errors.example.com/api/v1/notices");
}
