// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider adapter for the Artifex generation engine.
//!
//! This is the edit-capable variant: requests without reference images go to
//! the JSON generation endpoint; requests with references switch to the
//! multipart edit endpoint. Output sizes come from a fixed enumerated set,
//! matched to the requested aspect ratio. There is no fine-grained
//! streaming -- exactly two progress milestones are emitted, one on dispatch
//! and one on response receipt.

pub mod client;
pub mod types;

use async_trait::async_trait;
use artifex_core::{
    ArtifexError, AspectRatio, GenerationError, GenerationRequest, GenerationSink, ImageData,
    ImageProvider, ProviderConfig, ProviderKind,
};
use tracing::debug;

use crate::client::OpenAiClient;
use crate::types::ImagesRequest;

/// The provider's fixed output size set, with the aspect ratio each encodes.
const SIZES: [(&str, f64); 3] = [
    ("1024x1024", 1.0),
    ("1536x1024", 1.5),
    ("1024x1536", 2.0 / 3.0),
];

/// Maps a requested aspect ratio to the nearest enumerated size.
fn map_size(aspect: AspectRatio) -> &'static str {
    let target = aspect.ratio();
    let mut best = SIZES[0];
    for candidate in SIZES {
        if (candidate.1 - target).abs() < (best.1 - target).abs() {
            best = candidate;
        }
    }
    best.0
}

/// OpenAI image generation/edit provider.
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    pub fn new() -> Result<Self, ArtifexError> {
        Ok(Self {
            client: OpenAiClient::new()?,
        })
    }

    #[cfg(test)]
    fn with_client(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageProvider for OpenAiProvider {
    async fn generate(
        &self,
        config: &ProviderConfig,
        request: &GenerationRequest,
        sink: &dyn GenerationSink,
    ) -> Result<Vec<ImageData>, GenerationError> {
        config
            .validate()
            .and_then(|_| request.validate(ProviderKind::OpenAi))
            .map_err(|e| GenerationError::fatal(e.to_string()))?;

        let body = ImagesRequest {
            model: config.model.clone(),
            prompt: request.prompt.clone(),
            n: 1,
            size: map_size(request.aspect_ratio).to_string(),
        };

        sink.progress(25, "request dispatched").await;

        let response = if request.reference_images.is_empty() {
            self.client.generate(config, &body).await?
        } else {
            debug!(
                references = request.reference_images.len(),
                "switching to multipart edit request"
            );
            self.client
                .edit(config, &body, &request.reference_images)
                .await?
        };

        sink.progress(75, "response received").await;

        if response.data.is_empty() {
            return Err(GenerationError::empty("response contained zero images"));
        }

        let mut images = Vec::with_capacity(response.data.len());
        for datum in response.data {
            match datum.b64_json {
                Some(data) => images.push(ImageData::new("image/png", data)),
                None => {
                    return Err(GenerationError::malformed(
                        "image entry carried no base64 payload",
                    ));
                }
            }
        }
        Ok(images)
    }
}
