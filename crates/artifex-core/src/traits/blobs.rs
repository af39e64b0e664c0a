// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blob store contract for large binary payloads.
//!
//! Images are physically owned by the blob store, keyed by item identity and
//! artifact kind; queue items hold at most a cached copy. From the queue's
//! perspective all calls are best-effort: a failed write is logged, never
//! surfaced as a generation failure.

use async_trait::async_trait;

use crate::error::ArtifexError;
use crate::types::{ArtifactKind, ImageData, ItemId};

/// All images stored for one item, grouped by artifact kind.
#[derive(Debug, Clone, Default)]
pub struct ItemImages {
    pub reference: Vec<ImageData>,
    pub interim: Vec<ImageData>,
    pub final_: Vec<ImageData>,
}

/// Persistent key-value store for image payloads.
///
/// `save` is idempotent: writing the same item/kind twice overwrites rather
/// than duplicates.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn save(
        &self,
        item: &ItemId,
        kind: ArtifactKind,
        images: &[ImageData],
    ) -> Result<(), ArtifexError>;

    async fn load(&self, item: &ItemId, kind: ArtifactKind) -> Result<Vec<ImageData>, ArtifexError>;

    async fn load_all(&self, item: &ItemId) -> Result<ItemImages, ArtifexError>;

    async fn delete(&self, item: &ItemId) -> Result<(), ArtifexError>;
}
