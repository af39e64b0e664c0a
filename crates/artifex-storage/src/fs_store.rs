// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::debug;

use artifex_core::{ArtifactKind, ArtifexError, BlobStore, ImageData, ItemId, ItemImages};

/// Blob store rooted at a directory on the local filesystem.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn kind_dir(&self, item: &ItemId, kind: ArtifactKind) -> PathBuf {
        self.root.join(&item.0).join(kind.to_string())
    }
}

fn storage_error(err: impl std::error::Error + Send + Sync + 'static) -> ArtifexError {
    ArtifexError::Storage {
        source: Box::new(err),
    }
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}

fn mime_for(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    /// Replaces everything stored for (item, kind); a second save with the
    /// same arguments leaves the directory identical, never appended-to.
    async fn save(
        &self,
        item: &ItemId,
        kind: ArtifactKind,
        images: &[ImageData],
    ) -> Result<(), ArtifexError> {
        let dir = self.kind_dir(item, kind);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(storage_error(e)),
        }
        tokio::fs::create_dir_all(&dir).await.map_err(storage_error)?;

        for (index, image) in images.iter().enumerate() {
            let bytes = BASE64.decode(&image.data).map_err(storage_error)?;
            let path = dir.join(format!("{index}.{}", extension_for(&image.mime_type)));
            tokio::fs::write(&path, bytes).await.map_err(storage_error)?;
        }
        debug!(item = %item, kind = %kind, count = images.len(), "artifacts written");
        Ok(())
    }

    async fn load(&self, item: &ItemId, kind: ArtifactKind) -> Result<Vec<ImageData>, ArtifexError> {
        let dir = self.kind_dir(item, kind);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error(e)),
        };

        // Index-prefixed filenames; sort numerically so 10.png follows 9.png.
        let mut files: Vec<(u32, PathBuf)> = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(storage_error)? {
            let path = entry.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(index) = stem.parse::<u32>() {
                files.push((index, path));
            }
        }
        files.sort_by_key(|(index, _)| *index);

        let mut images = Vec::with_capacity(files.len());
        for (_, path) in files {
            let bytes = tokio::fs::read(&path).await.map_err(storage_error)?;
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default();
            images.push(ImageData::new(mime_for(extension), BASE64.encode(bytes)));
        }
        Ok(images)
    }

    async fn load_all(&self, item: &ItemId) -> Result<ItemImages, ArtifexError> {
        Ok(ItemImages {
            reference: self.load(item, ArtifactKind::Reference).await?,
            interim: self.load(item, ArtifactKind::Interim).await?,
            final_: self.load(item, ArtifactKind::Final).await?,
        })
    }

    async fn delete(&self, item: &ItemId) -> Result<(), ArtifexError> {
        match tokio::fs::remove_dir_all(self.root.join(&item.0)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(e)),
        }
    }
}
