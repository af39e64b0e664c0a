// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so mistyped keys are
//! rejected at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

use artifex_core::{AspectRatio, ProviderKind, Resolution};

/// Top-level Artifex configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; the only thing a working setup must supply is an API key for
/// the active provider.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifexConfig {
    /// Which provider handles new requests, and output defaults.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Gemini credentials and model selection.
    #[serde(default)]
    pub gemini: ProviderSection,

    /// OpenAI credentials and model selection.
    #[serde(default)]
    pub openai: ProviderSection,

    /// OpenRouter credentials and model selection.
    #[serde(default)]
    pub openrouter: ProviderSection,

    /// Artifact storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Active provider and default output parameters for new requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Provider used for new generation requests.
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,

    /// Default output resolution.
    #[serde(default)]
    pub resolution: Resolution,

    /// Default output aspect ratio.
    #[serde(default)]
    pub aspect_ratio: AspectRatio,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            resolution: Resolution::default(),
            aspect_ratio: AspectRatio::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_provider() -> ProviderKind {
    ProviderKind::Gemini
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Per-provider credentials and model override.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSection {
    /// API key. `None` means the provider cannot be used.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier. `None` falls back to the provider's default model.
    #[serde(default)]
    pub model: Option<String>,
}

/// Artifact storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory where generated artifacts are written.
    #[serde(default = "default_blob_dir")]
    pub blob_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            blob_dir: default_blob_dir(),
        }
    }
}

fn default_blob_dir() -> String {
    dirs::data_dir()
        .map(|d| d.join("artifex/blobs").display().to_string())
        .unwrap_or_else(|| ".artifex/blobs".to_string())
}

impl ArtifexConfig {
    /// The configured section for one provider.
    pub fn provider_section(&self, kind: ProviderKind) -> &ProviderSection {
        match kind {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::OpenRouter => &self.openrouter,
        }
    }

    /// The model used for a provider, falling back to its default.
    pub fn model_for(&self, kind: ProviderKind) -> String {
        self.provider_section(kind)
            .model
            .clone()
            .unwrap_or_else(|| kind.default_model().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_gemini() {
        let config = ArtifexConfig::default();
        assert_eq!(config.generation.provider, ProviderKind::Gemini);
        assert_eq!(config.generation.log_level, "info");
        assert!(config.gemini.api_key.is_none());
    }

    #[test]
    fn model_falls_back_to_provider_default() {
        let config = ArtifexConfig::default();
        assert_eq!(
            config.model_for(ProviderKind::OpenAi),
            ProviderKind::OpenAi.default_model()
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml_str = r#"
[generation]
provder = "gemini"
"#;
        assert!(toml::from_str::<ArtifexConfig>(toml_str).is_err());
    }

    #[test]
    fn provider_sections_deserialize() {
        let toml_str = r#"
[generation]
provider = "openrouter"
aspect_ratio = "widescreen"

[openrouter]
api_key = "sk-or-abc"
model = "black-forest-labs/flux-1.1-pro"
"#;
        let config: ArtifexConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.generation.provider, ProviderKind::OpenRouter);
        assert_eq!(config.generation.aspect_ratio, AspectRatio::Widescreen);
        assert_eq!(
            config.model_for(ProviderKind::OpenRouter),
            "black-forest-labs/flux-1.1-pro"
        );
    }
}
