//! Relay runtime configuration.

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_BIND_ADDRESS, DEFAULT_LOG_LEVEL, DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL, DEFAULT_PORT, DEFAULT_STATIC_DIR, DEFAULT_UPSTREAM_TIMEOUT_SECS,
    DEFAULT_UPSTREAM_URL,
};

/// Immutable configuration, read once at startup and shared by every request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RelayConfig {
    /// Upstream API key. `None` keeps the server up but fails each extract call.
    pub api_key: Option<String>,
    /// Upstream chat-completions base URL
    pub upstream_url: String,
    /// Model named in every upstream request
    pub model: String,
    /// Output-token bound sent upstream
    pub max_tokens: u32,
    /// Upstream request timeout in seconds
    pub upstream_timeout_secs: u64,
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Static asset directory
    pub static_dir: String,
    /// Request body limit in bytes
    pub max_body_bytes: usize,
    /// Directory for rolling JSON log files; console only when unset
    pub log_dir: Option<String>,
    /// Log level
    pub log_level: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_dir: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl RelayConfig {
    /// `bind_address:port`, suitable for `SocketAddr` parsing.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}
