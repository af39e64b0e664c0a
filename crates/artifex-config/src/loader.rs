// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading via Figment.
//!
//! Merge order (later overrides earlier): compiled defaults, then
//! `/etc/artifex/artifex.toml`, then `~/.config/artifex/artifex.toml`,
//! then `./artifex.toml`, then `ARTIFEX_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ArtifexConfig;

/// Load configuration from the standard XDG hierarchy with env overrides.
pub fn load_config() -> Result<ArtifexConfig, figment::Error> {
    base_figment().extract()
}

/// Load configuration from an inline TOML string (defaults still apply,
/// no file lookup, no environment). Used in tests.
pub fn load_config_from_str(toml_content: &str) -> Result<ArtifexConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ArtifexConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file with env overrides, skipping
/// the XDG hierarchy.
pub fn load_config_from_path(path: &Path) -> Result<ArtifexConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ArtifexConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

fn base_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ArtifexConfig::default()))
        .merge(Toml::file("/etc/artifex/artifex.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("artifex/artifex.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("artifex.toml"))
        .merge(env_provider())
}

/// Environment provider using explicit `map()` for section-to-dot mapping.
///
/// `Env::split("_")` would mis-parse keys that themselves contain
/// underscores; `ARTIFEX_GENERATION_ASPECT_RATIO` must become
/// `generation.aspect_ratio`, not `generation.aspect.ratio`.
fn env_provider() -> Env {
    Env::prefixed("ARTIFEX_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("generation_", "generation.", 1)
            .replacen("gemini_", "gemini.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("openrouter_", "openrouter.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifex_core::ProviderKind;

    #[test]
    fn inline_toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[generation]
provider = "openai"

[openai]
api_key = "sk-test"
"#,
        )
        .unwrap();
        assert_eq!(config.generation.provider, ProviderKind::OpenAi);
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.generation.provider, ProviderKind::Gemini);
    }

    #[test]
    fn explicit_path_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifex.toml");
        std::fs::write(&path, "[gemini]\napi_key = \"from-file\"\n").unwrap();

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.gemini.api_key.as_deref(), Some("from-file"));
    }
}
