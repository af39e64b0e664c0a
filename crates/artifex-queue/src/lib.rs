// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation work queue for Artifex.
//!
//! Owns the item lifecycle (`pending -> generating -> completed | error`),
//! runs a single background worker that processes items strictly one at a
//! time in FIFO order, and applies a per-provider retry policy to transient
//! failures. Binary artifacts are handed off to a [`BlobStore`]
//! implementation; the queue keeps only bounded in-memory caches.
//!
//! [`BlobStore`]: artifex_core::BlobStore

pub mod item;
pub mod queue;
pub mod retry;
mod ticker;

pub use item::{ItemStatus, QueueItem, RecentImages, INTERIM_CAPACITY};
pub use queue::GenerationQueue;
pub use retry::{RetryPolicy, RetryState, MAX_RETRIES_MESSAGE};
