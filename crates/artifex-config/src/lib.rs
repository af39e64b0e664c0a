// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Artifex generation engine.
//!
//! TOML configuration with strict key checking (`deny_unknown_fields`),
//! XDG file hierarchy lookup, `ARTIFEX_*` environment overrides, and
//! miette-rendered diagnostics with typo suggestions.

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ArtifexConfig, GenerationConfig, ProviderSection, StorageConfig};

/// Load configuration from the XDG hierarchy and validate it.
///
/// On deserialization failure the figment error is converted into rich
/// diagnostics; on success, semantic validation runs over the result.
pub fn load_and_validate() -> Result<ArtifexConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load configuration from an inline TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<ArtifexConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Gather TOML file contents so diagnostics can annotate source spans.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string("artifex.toml") {
        let path = std::env::current_dir()
            .map(|d| d.join("artifex.toml").display().to_string())
            .unwrap_or_else(|_| "artifex.toml".to_string());
        sources.push((path, content));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("artifex/artifex.toml");
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.push((path.display().to_string(), content));
        }
    }

    let system_path = std::path::Path::new("/etc/artifex/artifex.toml");
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.push((system_path.display().to_string(), content));
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_inline_config_passes_end_to_end() {
        let config = load_and_validate_str(
            r#"
[gemini]
api_key = "k"
"#,
        )
        .unwrap();
        assert_eq!(config.gemini.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn unknown_key_produces_suggestion() {
        let errors = load_and_validate_str(
            r#"
[generation]
provder = "gemini"
"#,
        )
        .unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::UnknownKey { suggestion: Some(s), .. } if s == "provider"
        )));
    }

    #[test]
    fn missing_credential_surfaces_as_validation_error() {
        let errors = load_and_validate_str("").unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { .. })));
    }
}
