// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini provider adapter for the Artifex generation engine.
//!
//! This is the rich-streaming variant: one SSE request per attempt, with
//! thought text and interim preview frames forwarded through the sink as the
//! stream produces them. Resolution and aspect ratio are mapped into
//! Gemini's native `imageConfig` vocabulary.

pub mod client;
pub mod sse;
pub mod types;

use async_trait::async_trait;
use artifex_core::{
    ArtifexError, GenerationError, GenerationRequest, GenerationSink, ImageData, ImageProvider,
    ProviderConfig, ProviderKind,
};
use futures::StreamExt;
use tracing::debug;

use crate::client::GeminiClient;
use crate::sse::StreamEvent;
use crate::types::{Content, GenerateContentRequest, GenerationConfig, ImageConfig, Part};

/// Progress milestone once a final artifact has arrived but the stream is
/// still draining.
const FINAL_ARTIFACT_PROGRESS: u8 = 90;

/// Ceiling for the derived mid-stream progress heuristic.
const INTERIM_PROGRESS_CAP: u8 = 80;

/// Gemini streaming image-generation provider.
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn new() -> Result<Self, ArtifexError> {
        Ok(Self {
            client: GeminiClient::new()?,
        })
    }

    /// Creates a provider with an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Builds the wire request: prompt text first, then each reference image
    /// as an inline-data part, plus the native sizing vocabulary.
    fn build_request(request: &GenerationRequest) -> GenerateContentRequest {
        let mut parts = Vec::with_capacity(1 + request.reference_images.len());
        if !request.prompt.trim().is_empty() {
            parts.push(Part::text(request.prompt.clone()));
        }
        for image in &request.reference_images {
            parts.push(Part::inline_data(
                image.mime_type.clone(),
                image.data.clone(),
            ));
        }

        GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
                image_config: ImageConfig {
                    aspect_ratio: request.aspect_ratio.to_string(),
                    image_size: request.resolution.to_string(),
                },
            },
        }
    }
}

/// Derived progress from stream activity, informative only.
///
/// Monotonically increasing with thought/interim counts, capped below the
/// final-artifact and completion milestones.
fn interim_progress(thoughts: usize, interims: usize) -> u8 {
    let raw = 15 + 5 * thoughts + 10 * interims;
    (raw.min(INTERIM_PROGRESS_CAP as usize)) as u8
}

#[async_trait]
impl ImageProvider for GeminiProvider {
    async fn generate(
        &self,
        config: &ProviderConfig,
        request: &GenerationRequest,
        sink: &dyn GenerationSink,
    ) -> Result<Vec<ImageData>, GenerationError> {
        config
            .validate()
            .and_then(|_| request.validate(ProviderKind::Gemini))
            .map_err(|e| GenerationError::fatal(e.to_string()))?;

        let body = Self::build_request(request);
        let mut stream = self.client.stream_generate(config, &body).await?;

        let mut thoughts = 0usize;
        let mut interims = 0usize;
        let mut finals: Vec<ImageData> = Vec::new();

        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::Thought(text) => {
                    thoughts += 1;
                    sink.thought(&text).await;
                    sink.progress(interim_progress(thoughts, interims), "thinking")
                        .await;
                }
                StreamEvent::InterimImage(image) => {
                    interims += 1;
                    sink.interim_image(image).await;
                    sink.progress(interim_progress(thoughts, interims), "rendering preview")
                        .await;
                }
                StreamEvent::FinalImage(image) => {
                    finals.push(image);
                    sink.progress(FINAL_ARTIFACT_PROGRESS, "final image received")
                        .await;
                }
            }
        }

        debug!(
            thoughts,
            interims,
            finals = finals.len(),
            "gemini stream drained"
        );

        if finals.is_empty() {
            return Err(GenerationError::empty(
                "stream ended without producing an image",
            ));
        }
        Ok(finals)
    }
}
