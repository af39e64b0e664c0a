// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue item state: the mutable record of one generation job.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use artifex_core::{GenerationRequest, ImageData, ItemId, ProviderConfig};

/// Lifecycle states of a queue item.
///
/// `pending -> generating -> {completed | error}`; the terminal states are
/// never left. A rerun creates a new item rather than resurrecting the old.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Generating,
    Completed,
    Error,
}

impl ItemStatus {
    /// Whether the item has reached a terminal state.
    pub fn is_settled(self) -> bool {
        matches!(self, ItemStatus::Completed | ItemStatus::Error)
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatus::Pending => write!(f, "pending"),
            ItemStatus::Generating => write!(f, "generating"),
            ItemStatus::Completed => write!(f, "completed"),
            ItemStatus::Error => write!(f, "error"),
        }
    }
}

/// How many interim previews are kept; older frames are discarded so memory
/// stays bounded during long-running generations.
pub const INTERIM_CAPACITY: usize = 2;

/// Append-only ring of the most recent interim previews.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentImages {
    images: VecDeque<ImageData>,
}

impl RecentImages {
    /// Appends an image, dropping the oldest once at capacity.
    pub fn push(&mut self, image: ImageData) {
        if self.images.len() == INTERIM_CAPACITY {
            self.images.pop_front();
        }
        self.images.push_back(image);
    }

    pub fn latest(&self) -> Option<&ImageData> {
        self.images.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageData> {
        self.images.iter()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }
}

/// One generation job, owned exclusively by the queue.
///
/// Binary payloads are physically owned by the blob store; `final_images`
/// is a lazily hydrated cache and `final_count` stays authoritative even
/// when the cache is evicted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: ItemId,
    pub request: GenerationRequest,
    pub config: ProviderConfig,
    pub status: ItemStatus,
    /// 0-100, monotonically increasing within one attempt.
    pub progress: Option<u8>,
    pub status_message: Option<String>,
    /// Reasoning fragments, append-only in arrival order.
    pub thoughts: Vec<String>,
    pub interim_images: RecentImages,
    pub final_images: Option<Vec<ImageData>>,
    pub final_count: usize,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Wall time spent generating, maintained by the elapsed ticker.
    #[serde(default)]
    pub elapsed: Duration,
}

impl QueueItem {
    pub fn new(request: GenerationRequest, config: ProviderConfig) -> Self {
        Self {
            id: ItemId::new(),
            request,
            config,
            status: ItemStatus::Pending,
            progress: None,
            status_message: None,
            thoughts: Vec::new(),
            interim_images: RecentImages::default(),
            final_images: None,
            final_count: 0,
            error_message: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Records a progress milestone, never letting the percentage regress.
    pub fn record_progress(&mut self, percent: u8, message: &str) {
        let percent = percent.min(100);
        self.progress = Some(self.progress.map_or(percent, |p| p.max(percent)));
        self.status_message = Some(message.to_string());
    }

    /// Clears partial per-attempt output so a retry starts from a clean
    /// slate and the caller never sees progress regress or duplicate.
    pub fn clear_attempt_state(&mut self) {
        self.thoughts.clear();
        self.interim_images.clear();
        self.progress = None;
        self.status_message = None;
    }

    pub(crate) fn mark_generating(&mut self) {
        self.status = ItemStatus::Generating;
        self.started_at = Some(Utc::now());
        self.completed_at = None;
        self.elapsed = Duration::ZERO;
        self.error_message = None;
        self.clear_attempt_state();
    }

    pub(crate) fn mark_completed(&mut self, images: Vec<ImageData>) {
        self.status = ItemStatus::Completed;
        self.final_count = images.len();
        self.final_images = Some(images);
        self.record_progress(100, "complete");
        self.finish_timing();
    }

    pub(crate) fn mark_error(&mut self, message: &str) {
        self.status = ItemStatus::Error;
        self.error_message = Some(message.to_string());
        self.finish_timing();
    }

    // `elapsed` is left as the ticker's last write; it tracks the same
    // clock the worker runs on, which chrono timestamps do not.
    fn finish_timing(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    pub fn is_settled(&self) -> bool {
        self.status.is_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifex_core::ProviderKind;

    fn test_item() -> QueueItem {
        QueueItem::new(
            GenerationRequest::new("a quiet harbor"),
            ProviderConfig::new(ProviderKind::Gemini, "gemini-2.5-flash-image", "key"),
        )
    }

    #[test]
    fn interim_ring_keeps_most_recent_two() {
        let mut ring = RecentImages::default();
        for i in 0..5 {
            ring.push(ImageData::new("image/png", format!("frame-{i}")));
        }
        assert_eq!(ring.len(), INTERIM_CAPACITY);
        let frames: Vec<&str> = ring.iter().map(|i| i.data.as_str()).collect();
        assert_eq!(frames, vec!["frame-3", "frame-4"]);
        assert_eq!(ring.latest().unwrap().data, "frame-4");
    }

    #[test]
    fn progress_never_regresses() {
        let mut item = test_item();
        item.record_progress(40, "thinking");
        item.record_progress(25, "late echo");
        assert_eq!(item.progress, Some(40));
        item.record_progress(90, "final image received");
        assert_eq!(item.progress, Some(90));
        assert_eq!(item.status_message.as_deref(), Some("final image received"));
    }

    #[test]
    fn clear_attempt_state_resets_partial_output() {
        let mut item = test_item();
        item.thoughts.push("half a thought".into());
        item.interim_images.push(ImageData::new("image/png", "aW1n"));
        item.record_progress(55, "rendering preview");

        item.clear_attempt_state();
        assert!(item.thoughts.is_empty());
        assert!(item.interim_images.is_empty());
        assert_eq!(item.progress, None);
        assert_eq!(item.status_message, None);
    }

    #[test]
    fn settled_states() {
        assert!(!ItemStatus::Pending.is_settled());
        assert!(!ItemStatus::Generating.is_settled());
        assert!(ItemStatus::Completed.is_settled());
        assert!(ItemStatus::Error.is_settled());
    }

    #[test]
    fn serde_round_trip_preserves_status() {
        let mut item = test_item();
        item.mark_generating();
        let json = serde_json::to_string(&item).unwrap();
        let back: QueueItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, ItemStatus::Generating);
        assert_eq!(back.id, item.id);
    }
}
