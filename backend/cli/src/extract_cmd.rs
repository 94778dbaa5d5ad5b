//! CLI Extract Command
//!
//! Runs one image through the upstream provider and the normalizer without
//! starting the HTTP server.

use std::path::Path;

use anyhow::{bail, Result};
use tracing::info;

use plateread_config::RelayConfig;
use plateread_core::{normalize_reply, RelayError, VisionRequest};
use plateread_gateway::GatewayState;

use crate::data_url;

pub async fn run(config: &RelayConfig, file: &Path) -> Result<()> {
    let image = data_url::from_file(file).await?;
    let state = GatewayState::from_config(config)?;

    let Some(provider) = state.provider else {
        bail!(RelayError::MissingCredential(state.credential_var));
    };

    info!(file = %file.display(), bytes = image.len(), "Extracting from image file");
    let request = VisionRequest::for_image(image, &state.model, state.max_tokens);
    let reply = provider.complete(&request).await?;
    let response = normalize_reply(&reply.content)?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
