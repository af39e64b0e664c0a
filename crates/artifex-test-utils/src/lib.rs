// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Artifex workspace.
//!
//! Provides a scriptable mock provider and a recording sink so queue and
//! adapter behavior can be tested deterministically without network access.

pub mod memory_blobs;
pub mod mock_provider;
pub mod recording_sink;

pub use memory_blobs::MemoryBlobStore;
pub use mock_provider::MockImageProvider;
pub use recording_sink::{RecordingSink, SinkEvent};

use artifex_core::ImageData;

/// A tiny valid base64 payload standing in for real image bytes.
pub fn test_image() -> ImageData {
    ImageData::new("image/png", "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAA=")
}
