// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory blob store for queue tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use artifex_core::{ArtifactKind, ArtifexError, BlobStore, ImageData, ItemId, ItemImages};

/// A [`BlobStore`] backed by a plain map, keyed by item id and artifact kind.
#[derive(Default)]
pub struct MemoryBlobStore {
    entries: Mutex<HashMap<(String, ArtifactKind), Vec<ImageData>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of (item, kind) entries currently stored.
    pub async fn entry_count(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn save(
        &self,
        item: &ItemId,
        kind: ArtifactKind,
        images: &[ImageData],
    ) -> Result<(), ArtifexError> {
        self.entries
            .lock()
            .await
            .insert((item.0.clone(), kind), images.to_vec());
        Ok(())
    }

    async fn load(&self, item: &ItemId, kind: ArtifactKind) -> Result<Vec<ImageData>, ArtifexError> {
        Ok(self
            .entries
            .lock()
            .await
            .get(&(item.0.clone(), kind))
            .cloned()
            .unwrap_or_default())
    }

    async fn load_all(&self, item: &ItemId) -> Result<ItemImages, ArtifexError> {
        Ok(ItemImages {
            reference: self.load(item, ArtifactKind::Reference).await?,
            interim: self.load(item, ArtifactKind::Interim).await?,
            final_: self.load(item, ArtifactKind::Final).await?,
        })
    }

    async fn delete(&self, item: &ItemId) -> Result<(), ArtifexError> {
        self.entries
            .lock()
            .await
            .retain(|(id, _), _| id != &item.0);
        Ok(())
    }
}
