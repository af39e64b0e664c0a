// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine assembly: wires the provider adapters, blob store, and work queue
//! into one running generation engine.

pub mod router;

use std::sync::Arc;

use artifex_config::ArtifexConfig;
use artifex_core::{ArtifexError, BlobStore, ImageProvider, ProviderConfig, ProviderKind};
use artifex_queue::GenerationQueue;
use artifex_storage::FsBlobStore;

pub use router::ProviderRouter;

/// Builds the generation queue from validated configuration.
pub fn build_engine(config: &ArtifexConfig) -> Result<GenerationQueue, ArtifexError> {
    let provider: Arc<dyn ImageProvider> = Arc::new(ProviderRouter::new()?);
    let blobs: Arc<dyn BlobStore> = Arc::new(FsBlobStore::new(&config.storage.blob_dir));
    Ok(GenerationQueue::new(provider, blobs))
}

/// Resolves the active provider's credentials and model into the
/// [`ProviderConfig`] attached to each request.
pub fn active_provider_config(config: &ArtifexConfig) -> Result<ProviderConfig, ArtifexError> {
    let kind = config.generation.provider;
    let section = config.provider_section(kind);
    let api_key = section
        .api_key
        .clone()
        .ok_or_else(|| ArtifexError::Config(format!("no API key configured for provider {kind}")))?;
    let provider_config = ProviderConfig::new(kind, config.model_for(kind), api_key);
    provider_config.validate()?;
    Ok(provider_config)
}

/// Convenience for callers that need a config for a specific provider
/// rather than the active one.
pub fn provider_config_for(
    config: &ArtifexConfig,
    kind: ProviderKind,
) -> Result<ProviderConfig, ArtifexError> {
    let mut scoped = config.clone();
    scoped.generation.provider = kind;
    active_provider_config(&scoped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_config_requires_credential() {
        let config = ArtifexConfig::default();
        assert!(matches!(
            active_provider_config(&config),
            Err(ArtifexError::Config(_))
        ));
    }

    #[test]
    fn active_config_uses_default_model() {
        let mut config = ArtifexConfig::default();
        config.gemini.api_key = Some("key".to_string());
        let provider_config = active_provider_config(&config).unwrap();
        assert_eq!(provider_config.provider, ProviderKind::Gemini);
        assert_eq!(provider_config.model, ProviderKind::Gemini.default_model());
    }

    #[test]
    fn scoped_config_targets_requested_provider() {
        let mut config = ArtifexConfig::default();
        config.openrouter.api_key = Some("sk-or".to_string());
        let provider_config = provider_config_for(&config, ProviderKind::OpenRouter).unwrap();
        assert_eq!(provider_config.provider, ProviderKind::OpenRouter);
    }
}
