// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for image-generation back ends.

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::traits::sink::GenerationSink;
use crate::types::{GenerationRequest, ImageData, ProviderConfig};

/// Adapter for one image-generation back end.
///
/// A call to [`generate`](ImageProvider::generate) performs exactly one
/// network attempt and returns once that attempt has fully settled. Interim
/// output (thoughts, preview frames, progress milestones) is reported through
/// the sink as it arrives; final artifacts are the return value.
///
/// Adapters never retry internally and retain no state between invocations.
/// Retry orchestration belongs to the work queue.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Runs one generation attempt against the back end.
    ///
    /// Returns the final artifacts on success. An attempt that settles
    /// without producing any artifact must be reported as a classified
    /// [`GenerationError`] (class `no-artifact`), not as an empty `Ok`.
    async fn generate(
        &self,
        config: &ProviderConfig,
        request: &GenerationRequest,
        sink: &dyn GenerationSink,
    ) -> Result<Vec<ImageData>, GenerationError>;
}
