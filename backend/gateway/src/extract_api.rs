//! Extraction endpoint (`POST /api/extract`).

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use plateread_core::{normalize_reply, ExtractionResponse, RelayError, VisionRequest};

use crate::error::ApiError;
use crate::server::GatewayState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    /// Image as a data URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// Handler for `POST /api/extract`.
///
/// Input is checked before the credential, and both before any upstream call.
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn extract(
    State(state): State<GatewayState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractionResponse>, ApiError> {
    let Json(request) = payload?;
    let image = request
        .image
        .filter(|image| !image.is_empty())
        .ok_or(RelayError::MissingImage)?;

    let provider = state
        .provider
        .as_ref()
        .ok_or_else(|| RelayError::MissingCredential(state.credential_var.clone()))?;

    debug!(provider = provider.name(), image_bytes = image.len(), "Forwarding image upstream");
    let vision_request = VisionRequest::for_image(image, &state.model, state.max_tokens);
    let reply = provider.complete(&vision_request).await?;
    let response = normalize_reply(&reply.content)?;

    info!(
        provider = provider.name(),
        model = %reply.model,
        latency_ms = reply.latency_ms,
        results = response.len(),
        uncertain = response.uncertain_count(),
        "Extraction complete"
    );
    Ok(Json(response))
}
