// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scriptable mock image provider for queue and retry tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use artifex_core::{
    GenerationError, GenerationRequest, GenerationSink, ImageData, ImageProvider, ProviderConfig,
};

use crate::test_image;

/// A mock provider that replays pre-scripted attempt outcomes.
///
/// Outcomes are popped FIFO; when the script is exhausted, every further
/// attempt succeeds with a single [`test_image`]. An optional artificial
/// latency makes single-flight behavior observable in tests.
pub struct MockImageProvider {
    script: Mutex<VecDeque<Result<Vec<ImageData>, GenerationError>>>,
    calls: AtomicU32,
    latency: Option<Duration>,
    /// Thought lines emitted through the sink before each outcome.
    thoughts_per_attempt: Vec<String>,
}

impl MockImageProvider {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: AtomicU32::new(0),
            latency: None,
            thoughts_per_attempt: Vec::new(),
        }
    }

    /// Pre-loads attempt outcomes, consumed in order.
    pub fn with_outcomes(outcomes: Vec<Result<Vec<ImageData>, GenerationError>>) -> Self {
        Self {
            script: Mutex::new(VecDeque::from(outcomes)),
            ..Self::new()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_thoughts(mut self, thoughts: Vec<String>) -> Self {
        self.thoughts_per_attempt = thoughts;
        self
    }

    pub async fn push_outcome(&self, outcome: Result<Vec<ImageData>, GenerationError>) {
        self.script.lock().await.push_back(outcome);
    }

    /// Number of generate() invocations so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockImageProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate(
        &self,
        _config: &ProviderConfig,
        _request: &GenerationRequest,
        sink: &dyn GenerationSink,
    ) -> Result<Vec<ImageData>, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        for thought in &self.thoughts_per_attempt {
            sink.thought(thought).await;
        }

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(vec![test_image()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifex_core::{ErrorClass, ProviderKind};
    use crate::RecordingSink;

    fn config() -> ProviderConfig {
        ProviderConfig::new(ProviderKind::Gemini, "gemini-2.5-flash-image", "key")
    }

    #[tokio::test]
    async fn outcomes_replay_in_order_then_default_success() {
        let provider = MockImageProvider::with_outcomes(vec![
            Err(GenerationError::status(500, "boom")),
            Ok(vec![test_image(), test_image()]),
        ]);
        let sink = RecordingSink::new();
        let request = GenerationRequest::new("x");

        let first = provider.generate(&config(), &request, &sink).await;
        assert_eq!(first.unwrap_err().class, ErrorClass::TransientServer);

        let second = provider.generate(&config(), &request, &sink).await.unwrap();
        assert_eq!(second.len(), 2);

        let third = provider.generate(&config(), &request, &sink).await.unwrap();
        assert_eq!(third.len(), 1);
        assert_eq!(provider.calls(), 3);
    }
}
