// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: credential presence
//! for the active provider, model membership, and a usable blob directory.
//! All failures are collected rather than failing fast.

use crate::diagnostic::ConfigError;
use crate::model::ArtifexConfig;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &ArtifexConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let active = config.generation.provider;
    let section = config.provider_section(active);

    match &section.api_key {
        None => errors.push(ConfigError::Validation {
            message: format!("[{active}] api_key is required when generation.provider = \"{active}\""),
        }),
        Some(key) if key.trim().is_empty() => errors.push(ConfigError::Validation {
            message: format!("[{active}] api_key must not be empty"),
        }),
        Some(_) => {}
    }

    if let Some(model) = &section.model {
        if !active.supported_models().contains(&model.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "[{active}] model `{model}` is not supported; valid models: {}",
                    active.supported_models().join(", ")
                ),
            });
        }
    }

    if config.storage.blob_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.blob_dir must not be empty".to_string(),
        });
    }

    const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
    if !LEVELS.contains(&config.generation.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "generation.log_level `{}` is not one of {}",
                config.generation.log_level,
                LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifex_core::ProviderKind;

    fn valid_config() -> ArtifexConfig {
        let mut config = ArtifexConfig::default();
        config.gemini.api_key = Some("key".to_string());
        config
    }

    #[test]
    fn config_with_active_key_validates() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn missing_active_provider_key_fails() {
        let config = ArtifexConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("api_key is required"))));
    }

    #[test]
    fn key_for_inactive_provider_is_not_required() {
        let mut config = valid_config();
        config.openai.api_key = None;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unsupported_model_fails() {
        let mut config = valid_config();
        config.gemini.model = Some("dall-e-2".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("not supported"))));
    }

    #[test]
    fn multiple_failures_are_all_reported() {
        let mut config = ArtifexConfig::default();
        config.generation.provider = ProviderKind::OpenAi;
        config.openai.model = Some("bogus".to_string());
        config.storage.blob_dir = " ".to_string();
        config.generation.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
