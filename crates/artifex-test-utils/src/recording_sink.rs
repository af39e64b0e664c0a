// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sink implementation that records every event it receives.

use async_trait::async_trait;
use tokio::sync::Mutex;

use artifex_core::{GenerationSink, ImageData};

/// One recorded sink event, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Thought(String),
    InterimImage(ImageData),
    Progress(u8, String),
}

/// A [`GenerationSink`] that appends every event to an in-memory log.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events recorded so far.
    pub async fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().await.clone()
    }

    pub async fn thought_count(&self) -> usize {
        self.events
            .lock()
            .await
            .iter()
            .filter(|e| matches!(e, SinkEvent::Thought(_)))
            .count()
    }
}

#[async_trait]
impl GenerationSink for RecordingSink {
    async fn thought(&self, text: &str) {
        self.events
            .lock()
            .await
            .push(SinkEvent::Thought(text.to_string()));
    }

    async fn interim_image(&self, image: ImageData) {
        self.events.lock().await.push(SinkEvent::InterimImage(image));
    }

    async fn progress(&self, percent: u8, message: &str) {
        self.events
            .lock()
            .await
            .push(SinkEvent::Progress(percent, message.to_string()));
    }
}
