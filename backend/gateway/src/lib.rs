//! plateread HTTP gateway.
//!
//! Provides the extraction endpoint, the health check, and static asset hosting.

pub mod error;
pub mod extract_api;
pub mod health_api;
pub mod server;
pub mod static_files;

pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState};
