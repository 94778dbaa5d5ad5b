use async_trait::async_trait;

use crate::error::RelayError;
use crate::prompt::{SYSTEM_INSTRUCTION, USER_CUE};

/// Trait for multimodal inference providers the relay forwards images to.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name (e.g., "openai", "mock").
    fn name(&self) -> &str;

    /// Send one image with its instructions and return the reply text.
    async fn complete(&self, request: &VisionRequest) -> Result<VisionReply, RelayError>;
}

/// Request to a vision provider.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    /// Image reference, normally a `data:` URL.
    pub image_url: String,
    pub max_tokens: u32,
}

impl VisionRequest {
    /// Package an image with the fixed extraction instructions.
    pub fn for_image(image_url: impl Into<String>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            system_prompt: SYSTEM_INSTRUCTION.to_string(),
            user_prompt: USER_CUE.to_string(),
            image_url: image_url.into(),
            max_tokens,
        }
    }
}

/// Raw reply from a vision provider.
#[derive(Debug, Clone)]
pub struct VisionReply {
    pub content: String,
    pub model: String,
    pub latency_ms: u64,
}
