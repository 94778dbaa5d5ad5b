//! Config validation: startup checks with user-friendly messages.

use crate::defaults::API_KEY_VAR;
use crate::schema::RelayConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &RelayConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_upstream(config, &mut report);
    validate_server(config, &mut report);
    report
}

fn validate_upstream(config: &RelayConfig, report: &mut ValidationReport) {
    if config.api_key.is_none() {
        report.warn(
            "apiKey",
            format!("{API_KEY_VAR} is not set; extract requests will fail with 500"),
        );
    }
    if config.model.trim().is_empty() {
        report.error("model", "Model name cannot be empty");
    }
    let url = config.upstream_url.trim();
    if url.is_empty() {
        report.error("upstreamUrl", "Upstream URL cannot be empty");
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        report.error("upstreamUrl", "Upstream URL must start with http:// or https://");
    }
    if config.max_tokens == 0 {
        report.warn("maxTokens", "maxTokens is 0; the model cannot reply");
    }
    if config.upstream_timeout_secs == 0 {
        report.warn("upstreamTimeoutSecs", "Timeout of 0 makes every upstream call fail");
    }
}

fn validate_server(config: &RelayConfig, report: &mut ValidationReport) {
    if config.max_body_bytes == 0 {
        report.error("maxBodyBytes", "Body limit must be greater than zero");
    }
    if config.static_dir.trim().is_empty() {
        report.warn("staticDir", "No static directory; only API routes will be served");
    }
}
