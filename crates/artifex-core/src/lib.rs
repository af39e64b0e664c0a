// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Artifex image-generation engine.
//!
//! This crate provides the shared data model, the two-layer error taxonomy,
//! and the trait seams (`ImageProvider`, `GenerationSink`, `BlobStore`) that
//! the provider adapter crates and the work queue implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ArtifexError, ErrorClass, GenerationError};
pub use traits::{BlobStore, GenerationSink, ImageProvider, ItemImages};
pub use types::{
    ArtifactKind, AspectRatio, GenerationRequest, ImageData, ItemId, ProviderConfig, ProviderKind,
    Resolution,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn provider_set_is_closed_at_three() {
        assert_eq!(ProviderKind::iter().count(), 3);
    }

    #[test]
    fn every_provider_has_a_default_model() {
        for kind in ProviderKind::iter() {
            assert!(kind.supported_models().contains(&kind.default_model()));
            assert!(kind.max_reference_images() >= 1);
        }
    }

    #[test]
    fn artifact_kind_tags() {
        let tags: Vec<String> = ArtifactKind::iter().map(|k| k.to_string()).collect();
        assert_eq!(tags, vec!["reference", "interim", "final"]);
    }
}
