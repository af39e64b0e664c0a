// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Artifex generation engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::ArtifexError;

/// Unique identifier for a queue item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    /// Generates a fresh random identity.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An image in binary-as-text form: a base64 payload plus its MIME type.
///
/// This is the single artifact representation used everywhere -- reference
/// inputs, interim previews, and final outputs all use it, regardless of how
/// the provider delivered the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

impl ImageData {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Renders the image as an RFC 2397 data URL.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Parses an RFC 2397 data URL (`data:<mime>;base64,<payload>`).
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (mime_type, payload) = rest.split_once(";base64,")?;
        if mime_type.is_empty() || payload.is_empty() {
            return None;
        }
        Some(Self::new(mime_type, payload))
    }

    /// Approximate decoded size in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len() / 4 * 3
    }
}

/// Target output resolution tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Resolution {
    #[default]
    #[strum(serialize = "1K")]
    #[serde(rename = "1K")]
    OneK,
    #[strum(serialize = "2K")]
    #[serde(rename = "2K")]
    TwoK,
    #[strum(serialize = "4K")]
    #[serde(rename = "4K")]
    FourK,
}

/// Target aspect ratio tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum AspectRatio {
    #[default]
    #[strum(serialize = "1:1")]
    Square,
    #[strum(serialize = "3:2")]
    Landscape,
    #[strum(serialize = "2:3")]
    Portrait,
    #[strum(serialize = "16:9")]
    Widescreen,
    #[strum(serialize = "9:16")]
    Tall,
}

impl AspectRatio {
    /// Width divided by height, used for nearest-match size mapping.
    pub fn ratio(self) -> f64 {
        match self {
            AspectRatio::Square => 1.0,
            AspectRatio::Landscape => 3.0 / 2.0,
            AspectRatio::Portrait => 2.0 / 3.0,
            AspectRatio::Widescreen => 16.0 / 9.0,
            AspectRatio::Tall => 9.0 / 16.0,
        }
    }
}

/// The closed set of supported generation back ends.
///
/// Deliberately an enum rather than a registry: provider-specific branches
/// stay exhaustiveness-checked at compile time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Rich-streaming provider: SSE stream with thoughts and interim previews.
    #[strum(serialize = "gemini")]
    Gemini,
    /// Edit-capable provider: JSON or multipart, fixed output size set.
    #[strum(serialize = "openai")]
    OpenAi,
    /// Flat request/response provider: inline data or fetchable URL results.
    #[strum(serialize = "openrouter")]
    OpenRouter,
}

impl ProviderKind {
    /// Models this provider accepts.
    pub fn supported_models(self) -> &'static [&'static str] {
        match self {
            ProviderKind::Gemini => &[
                "gemini-2.5-flash-image",
                "gemini-2.5-flash-image-preview",
                "gemini-2.0-flash-preview-image-generation",
            ],
            ProviderKind::OpenAi => &["gpt-image-1", "gpt-image-1-mini"],
            ProviderKind::OpenRouter => &[
                "google/gemini-2.5-flash-image",
                "openai/gpt-image-1",
                "black-forest-labs/flux-1.1-pro",
            ],
        }
    }

    /// Default model used when the configuration does not name one.
    pub fn default_model(self) -> &'static str {
        self.supported_models()[0]
    }

    /// Maximum number of reference images a single request may carry.
    pub fn max_reference_images(self) -> usize {
        match self {
            ProviderKind::Gemini => 3,
            ProviderKind::OpenAi => 10,
            ProviderKind::OpenRouter => 32,
        }
    }
}

/// One immutable generation request, reused verbatim across retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub reference_images: Vec<ImageData>,
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            reference_images: Vec::new(),
            resolution: Resolution::default(),
            aspect_ratio: AspectRatio::default(),
        }
    }

    /// Checks the request invariants against the target provider.
    ///
    /// A request must carry a non-empty prompt or at least one reference
    /// image, and may not exceed the provider's reference-image limit.
    pub fn validate(&self, provider: ProviderKind) -> Result<(), ArtifexError> {
        if self.prompt.trim().is_empty() && self.reference_images.is_empty() {
            return Err(ArtifexError::InvalidRequest(
                "prompt is empty and no reference images were supplied".to_string(),
            ));
        }
        let limit = provider.max_reference_images();
        if self.reference_images.len() > limit {
            return Err(ArtifexError::InvalidRequest(format!(
                "{provider} accepts at most {limit} reference images, got {}",
                self.reference_images.len()
            )));
        }
        Ok(())
    }
}

/// Provider selection plus the credential used for its network calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    pub model: String,
    /// Opaque credential string, carried as-is into request headers.
    pub api_key: String,
}

impl ProviderConfig {
    pub fn new(provider: ProviderKind, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Ensures the credential is present and the model belongs to the
    /// provider's supported set. Must pass before any network call.
    pub fn validate(&self) -> Result<(), ArtifexError> {
        if self.api_key.trim().is_empty() {
            return Err(ArtifexError::Config(format!(
                "no API key configured for provider {}",
                self.provider
            )));
        }
        if !self.provider.supported_models().contains(&self.model.as_str()) {
            return Err(ArtifexError::Config(format!(
                "model `{}` is not supported by provider {}",
                self.model, self.provider
            )));
        }
        Ok(())
    }
}

/// The kind of artifact a blob-store entry holds for an item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ArtifactKind {
    Reference,
    Interim,
    Final,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn item_ids_are_unique() {
        assert_ne!(ItemId::new(), ItemId::new());
    }

    #[test]
    fn data_url_round_trip() {
        let image = ImageData::new("image/png", "aGVsbG8=");
        let url = image.data_url();
        assert_eq!(url, "data:image/png;base64,aGVsbG8=");
        assert_eq!(ImageData::from_data_url(&url), Some(image));
    }

    #[test]
    fn data_url_rejects_non_base64_urls() {
        assert!(ImageData::from_data_url("https://example.com/cat.png").is_none());
        assert!(ImageData::from_data_url("data:text/plain,hello").is_none());
    }

    #[test]
    fn provider_kind_parses_from_tag() {
        assert_eq!(ProviderKind::from_str("gemini").unwrap(), ProviderKind::Gemini);
        assert_eq!(ProviderKind::from_str("openai").unwrap(), ProviderKind::OpenAi);
        assert_eq!(
            ProviderKind::from_str("openrouter").unwrap(),
            ProviderKind::OpenRouter
        );
        assert!(ProviderKind::from_str("dalle").is_err());
    }

    #[test]
    fn empty_request_is_rejected() {
        let request = GenerationRequest::new("   ");
        let err = request.validate(ProviderKind::Gemini).unwrap_err();
        assert!(matches!(err, ArtifexError::InvalidRequest(_)));
    }

    #[test]
    fn reference_only_request_is_valid() {
        let mut request = GenerationRequest::new("");
        request.reference_images.push(ImageData::new("image/png", "aGVsbG8="));
        assert!(request.validate(ProviderKind::Gemini).is_ok());
    }

    #[test]
    fn reference_limit_is_per_provider() {
        let mut request = GenerationRequest::new("a cat");
        for _ in 0..5 {
            request.reference_images.push(ImageData::new("image/png", "aGVsbG8="));
        }
        assert!(request.validate(ProviderKind::Gemini).is_err());
        assert!(request.validate(ProviderKind::OpenAi).is_ok());
        assert!(request.validate(ProviderKind::OpenRouter).is_ok());
    }

    #[test]
    fn provider_config_requires_credential() {
        let config = ProviderConfig::new(ProviderKind::Gemini, "gemini-2.5-flash-image", "  ");
        assert!(matches!(config.validate(), Err(ArtifexError::Config(_))));
    }

    #[test]
    fn provider_config_rejects_foreign_model() {
        let config = ProviderConfig::new(ProviderKind::OpenAi, "gemini-2.5-flash-image", "sk-test");
        assert!(config.validate().is_err());

        let config = ProviderConfig::new(ProviderKind::OpenAi, "gpt-image-1", "sk-test");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn aspect_ratio_tags_match_provider_vocabulary() {
        assert_eq!(AspectRatio::Square.to_string(), "1:1");
        assert_eq!(AspectRatio::Widescreen.to_string(), "16:9");
        assert_eq!(Resolution::TwoK.to_string(), "2K");
    }
}
