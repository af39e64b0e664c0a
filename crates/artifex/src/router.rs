// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch from [`ProviderKind`] to the matching adapter.
//!
//! The provider set is closed, so this is a plain enum match rather than a
//! registry; adding a provider is a compile-time change in one place.

use async_trait::async_trait;

use artifex_core::{
    ArtifexError, GenerationError, GenerationRequest, GenerationSink, ImageData, ImageProvider,
    ProviderConfig, ProviderKind,
};
use artifex_gemini::GeminiProvider;
use artifex_openai::OpenAiProvider;
use artifex_openrouter::OpenRouterProvider;

/// Routes each generation attempt to the adapter named in its config.
pub struct ProviderRouter {
    gemini: GeminiProvider,
    openai: OpenAiProvider,
    openrouter: OpenRouterProvider,
}

impl ProviderRouter {
    pub fn new() -> Result<Self, ArtifexError> {
        Ok(Self {
            gemini: GeminiProvider::new()?,
            openai: OpenAiProvider::new()?,
            openrouter: OpenRouterProvider::new()?,
        })
    }
}

#[async_trait]
impl ImageProvider for ProviderRouter {
    async fn generate(
        &self,
        config: &ProviderConfig,
        request: &GenerationRequest,
        sink: &dyn GenerationSink,
    ) -> Result<Vec<ImageData>, GenerationError> {
        match config.provider {
            ProviderKind::Gemini => self.gemini.generate(config, request, sink).await,
            ProviderKind::OpenAi => self.openai.generate(config, request, sink).await,
            ProviderKind::OpenRouter => self.openrouter.generate(config, request, sink).await,
        }
    }
}
