//! Main HTTP Gateway Server.
//!
//! Wires the extract and health endpoints, the static asset fallback, and the
//! shared per-process state.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument, warn};

use plateread_config::{RelayConfig, API_KEY_VAR};
use plateread_core::VisionProvider;
use plateread_providers::OpenAiVisionProvider;

use crate::{extract_api, health_api, static_files};

/// Application state shared across routes.
///
/// Built once from the config and never mutated, so concurrent requests share
/// nothing but the provider's HTTP client.
#[derive(Clone)]
pub struct GatewayState {
    /// `None` when the credential was missing at startup.
    pub provider: Option<Arc<dyn VisionProvider>>,
    pub model: String,
    pub max_tokens: u32,
    /// Env var named in the error when `provider` is missing.
    pub credential_var: String,
}

impl GatewayState {
    pub fn new(provider: Option<Arc<dyn VisionProvider>>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
            credential_var: API_KEY_VAR.to_string(),
        }
    }

    /// Build the state from the loaded config, constructing the upstream
    /// provider when a credential is present.
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let provider = match &config.api_key {
            Some(api_key) => {
                let provider: Arc<dyn VisionProvider> = Arc::new(
                    OpenAiVisionProvider::new(api_key)
                        .with_base_url(&config.upstream_url)
                        .with_timeout(Duration::from_secs(config.upstream_timeout_secs))?,
                );
                info!(upstream = %config.upstream_url, model = %config.model, "Registered OpenAI provider");
                Some(provider)
            }
            None => {
                warn!("{} not set; extract requests will be refused", API_KEY_VAR);
                None
            }
        };
        Ok(Self::new(provider, &config.model, config.max_tokens))
    }
}

/// Build the Axum router with all routes and layers.
pub fn build_router(state: GatewayState, config: &RelayConfig) -> Router {
    let mut app = Router::new()
        .route("/api/extract", post(extract_api::extract))
        .route("/api/health", get(health_api::get_health))
        .with_state(state);

    if let Some(static_router) = static_files::static_router(&config.static_dir) {
        app = app.fallback_service(static_router);
    }

    app.layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Starts the Axum HTTP server and runs until Ctrl-C.
#[instrument(skip(app))]
pub async fn start_server(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!("Gateway HTTP server listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
}
