// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the seams of the generation engine.

pub mod blobs;
pub mod provider;
pub mod sink;

pub use blobs::{BlobStore, ItemImages};
pub use provider::ImageProvider;
pub use sink::GenerationSink;
