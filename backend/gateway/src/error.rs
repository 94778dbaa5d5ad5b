//! Conversion of [`RelayError`] into JSON HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use plateread_core::RelayError;
use plateread_logging::redact_sensitive_data;

/// Handler error: always answered as `{"error": "..."}` with the mapped status.
#[derive(Debug)]
pub struct ApiError(pub RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self(RelayError::PayloadTooLarge)
        } else {
            Self(RelayError::InvalidBody(rejection.body_text()))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = self.0.public_message();
        let logged = redact_sensitive_data(&message);

        match &self.0 {
            RelayError::UpstreamRejection { status: upstream, .. } => {
                warn!(status = status.as_u16(), upstream_status = upstream, error = %logged, "Upstream rejected extract request");
            }
            err if err.is_client_error() || status == StatusCode::BAD_GATEWAY => {
                warn!(status = status.as_u16(), error = %logged, "Extract request failed");
            }
            err => {
                error!(status = status.as_u16(), error = %logged, detail = ?err, "Extract request errored");
            }
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
