use thiserror::Error;

/// Fallback text when the provider rejects a call without a readable message.
pub const UPSTREAM_FALLBACK_MESSAGE: &str = "Upstream inference request failed";

/// Fixed message for replies with no JSON object in them.
pub const PARSE_FAILURE_MESSAGE: &str = "Could not parse model response";

/// Top-level error type for a single extraction request.
///
/// Every variant maps to exactly one HTTP status via [`RelayError::status_code`],
/// so the gateway never has to guess how a failure should be surfaced.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing image")]
    MissingImage,

    #[error("{0}")]
    InvalidBody(String),

    #[error("Image payload too large")]
    PayloadTooLarge,

    #[error("{0} is not configured")]
    MissingCredential(String),

    #[error("{message}")]
    UpstreamRejection { status: u16, message: String },

    #[error("Could not parse model response")]
    ParseFailure,

    #[error("{0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl RelayError {
    /// Build an upstream rejection, substituting the generic text when the
    /// provider gave no usable message.
    pub fn upstream(status: u16, message: Option<String>) -> Self {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| UPSTREAM_FALLBACK_MESSAGE.to_string());
        Self::UpstreamRejection { status, message }
    }

    /// HTTP status the gateway answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingImage | Self::InvalidBody(_) => 400,
            Self::PayloadTooLarge => 413,
            Self::UpstreamRejection { .. } | Self::ParseFailure => 502,
            Self::MissingCredential(_) | Self::MalformedPayload(_) | Self::Unexpected(_) => 500,
        }
    }

    /// Text placed in the `error` field of the JSON body.
    pub fn public_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            message
        }
    }

    /// Whether the failure originates on the client side of the relay.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
