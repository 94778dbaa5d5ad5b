//! `plateread-config`: relay runtime configuration.
//!
//! Provides:
//! - Typed config (`RelayConfig`) with defaults
//! - Environment loading with invalid-value reporting
//! - Startup validation
//! - Config redaction for safe logging

pub mod defaults;
pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::API_KEY_VAR;
pub use env::{load_config, load_config_with, InvalidEnvVar, LoadedConfig};
pub use redact::redact;
pub use schema::RelayConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

/// Log a loaded config's problems and return whether it is usable.
///
/// Call after the logger is installed; invalid env values and warnings are
/// logged at `warn`, validation errors at `error`.
pub fn log_report(loaded: &LoadedConfig) -> bool {
    for invalid in &loaded.invalid {
        tracing::warn!(var = %invalid.var_name, value = %invalid.value, "Ignoring invalid env value");
    }
    let report = validate(&loaded.config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    report.is_valid()
}
