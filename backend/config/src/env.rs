//! Environment loading for [`RelayConfig`].
//!
//! Empty values count as unset. Numbers that fail to parse fall back to their
//! default and are reported as [`InvalidEnvVar`]s so startup can log them.

use std::collections::HashMap;
use std::str::FromStr;

use crate::defaults::API_KEY_VAR;
use crate::schema::RelayConfig;

/// An env var that was set but could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value {value:?} for env var \"{var_name}\"; using default")]
pub struct InvalidEnvVar {
    pub var_name: String,
    pub value: String,
}

/// A config together with the env vars that had to be ignored.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: RelayConfig,
    pub invalid: Vec<InvalidEnvVar>,
}

/// Load the config from the process environment.
pub fn load_config() -> LoadedConfig {
    load_config_with(&std::env::vars().collect())
}

/// Load the config from a provided map (useful for testing).
pub fn load_config_with(env: &HashMap<String, String>) -> LoadedConfig {
    let mut reader = EnvReader {
        env,
        invalid: Vec::new(),
    };
    let defaults = RelayConfig::default();

    let port = match reader.string("PLATEREAD_PORT") {
        Some(_) => reader.parsed("PLATEREAD_PORT", defaults.port),
        None => reader.parsed("PORT", defaults.port),
    };

    let config = RelayConfig {
        api_key: reader.string(API_KEY_VAR),
        upstream_url: reader
            .string("PLATEREAD_UPSTREAM_URL")
            .unwrap_or(defaults.upstream_url),
        model: reader.string("PLATEREAD_MODEL").unwrap_or(defaults.model),
        max_tokens: reader.parsed("PLATEREAD_MAX_TOKENS", defaults.max_tokens),
        upstream_timeout_secs: reader
            .parsed("PLATEREAD_TIMEOUT_SECS", defaults.upstream_timeout_secs),
        bind_address: reader.string("PLATEREAD_BIND").unwrap_or(defaults.bind_address),
        port,
        static_dir: reader
            .string("PLATEREAD_STATIC_DIR")
            .unwrap_or(defaults.static_dir),
        max_body_bytes: reader.parsed("PLATEREAD_MAX_BODY_BYTES", defaults.max_body_bytes),
        log_dir: reader.string("PLATEREAD_LOG_DIR"),
        log_level: reader.string("RUST_LOG").unwrap_or(defaults.log_level),
    };

    LoadedConfig {
        config,
        invalid: reader.invalid,
    }
}

struct EnvReader<'a> {
    env: &'a HashMap<String, String>,
    invalid: Vec<InvalidEnvVar>,
}

impl EnvReader<'_> {
    fn string(&self, name: &str) -> Option<String> {
        self.env
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn parsed<T: FromStr>(&mut self, name: &str, default: T) -> T {
        let Some(raw) = self.string(name) else {
            return default;
        };
        match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                self.invalid.push(InvalidEnvVar {
                    var_name: name.to_string(),
                    value: raw,
                });
                default
            }
        }
    }
}
