//! Structured logging for the plateread relay.
//!
//! Handles subscriber setup (console + rolling JSON file) and log redaction.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
