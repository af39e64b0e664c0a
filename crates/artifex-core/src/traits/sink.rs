// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event sink through which provider adapters report interim output.

use async_trait::async_trait;

use crate::types::ImageData;

/// Receives interim output from a provider adapter during one attempt.
///
/// Implementations relay events into queue item state. Delivery order matches
/// the order the underlying stream produced them. An implementation may turn
/// into a no-op mid-attempt (e.g., when the item is removed from the queue);
/// adapters must not depend on events being observed.
#[async_trait]
pub trait GenerationSink: Send + Sync {
    /// Incremental reasoning text emitted mid-stream.
    async fn thought(&self, text: &str);

    /// A non-final preview frame emitted mid-stream.
    async fn interim_image(&self, image: ImageData);

    /// Progress milestone (0-100) with a short status message.
    ///
    /// Progress is an informative heuristic, not a contract; receivers
    /// enforce monotonicity.
    async fn progress(&self, percent: u8, message: &str);
}
