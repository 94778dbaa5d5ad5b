//! Config defaults for every tunable the relay reads from the environment.

/// Env var holding the upstream credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Default upstream base URL.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openai.com/v1";

/// Default multimodal model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default output-token bound per reply.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Default upstream timeout (seconds).
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 3000;

/// Directory served for every path that is not an API route.
pub const DEFAULT_STATIC_DIR: &str = "public";

/// Largest accepted request body (10 MiB); data-URL images are bulky.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub const DEFAULT_LOG_LEVEL: &str = "info";
