// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-flight FIFO generation queue.
//!
//! One background worker drains pending items in arrival order, driving each
//! through the retry policy until it settles. All item state lives behind one
//! mutex; callers get snapshots, never references into queue internals.

use std::sync::Arc;

use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use async_trait::async_trait;
use artifex_core::{
    ArtifactKind, ArtifexError, BlobStore, GenerationError, GenerationRequest, GenerationSink,
    ImageData, ImageProvider, ItemId, ProviderConfig,
};

use crate::item::{ItemStatus, QueueItem};
use crate::retry::{RetryPolicy, RetryState, MAX_RETRIES_MESSAGE};
use crate::ticker;

struct Inner {
    items: Arc<Mutex<Vec<QueueItem>>>,
    notify: Notify,
    provider: Arc<dyn ImageProvider>,
    blobs: Arc<dyn BlobStore>,
    cancel: CancellationToken,
}

/// Handle to the generation queue. Cheap to clone; all clones share the same
/// worker and item list.
#[derive(Clone)]
pub struct GenerationQueue {
    inner: Arc<Inner>,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl GenerationQueue {
    /// Starts an empty queue with its background worker.
    pub fn new(provider: Arc<dyn ImageProvider>, blobs: Arc<dyn BlobStore>) -> Self {
        Self::with_items(provider, blobs, Vec::new())
    }

    /// Starts a queue seeded with previously persisted items.
    ///
    /// Items found in the generating state were interrupted mid-attempt by a
    /// shutdown or crash; they are demoted to pending with their partial
    /// output cleared, so the worker picks them up again from scratch.
    pub fn with_items(
        provider: Arc<dyn ImageProvider>,
        blobs: Arc<dyn BlobStore>,
        mut items: Vec<QueueItem>,
    ) -> Self {
        let recovered = recover_items(&mut items);
        if recovered > 0 {
            info!(count = recovered, "recovered interrupted items to pending");
        }

        let inner = Arc::new(Inner {
            items: Arc::new(Mutex::new(items)),
            notify: Notify::new(),
            provider,
            blobs,
            cancel: CancellationToken::new(),
        });
        let worker = tokio::spawn(worker_loop(Arc::clone(&inner)));
        Self {
            inner,
            worker: Arc::new(Mutex::new(Some(worker))),
        }
    }

    /// Validates and enqueues a new generation job, returning its id.
    ///
    /// Reference images are persisted to the blob store in the background;
    /// enqueueing never waits on storage.
    pub async fn enqueue(
        &self,
        request: GenerationRequest,
        config: ProviderConfig,
    ) -> Result<ItemId, ArtifexError> {
        config.validate()?;
        request.validate(config.provider)?;

        let item = QueueItem::new(request, config);
        let id = item.id.clone();

        if !item.request.reference_images.is_empty() {
            save_blobs_detached(
                Arc::clone(&self.inner.blobs),
                id.clone(),
                ArtifactKind::Reference,
                item.request.reference_images.clone(),
            );
        }

        self.inner.items.lock().await.push(item);
        self.inner.notify.notify_one();
        debug!(item = %id, "item enqueued");
        Ok(id)
    }

    /// Re-submits a settled item's request as a brand-new item.
    ///
    /// The original keeps its identity, artifacts, and history untouched.
    pub async fn rerun(&self, id: &ItemId) -> Result<ItemId, ArtifexError> {
        let (request, config) = {
            let items = self.inner.items.lock().await;
            let item = items
                .iter()
                .find(|i| &i.id == id)
                .ok_or_else(|| ArtifexError::UnknownItem(id.to_string()))?;
            if !item.is_settled() {
                return Err(ArtifexError::InvalidRequest(
                    "only completed or failed items can be rerun".to_string(),
                ));
            }
            (item.request.clone(), item.config.clone())
        };
        self.enqueue(request, config).await
    }

    /// Removes an item and schedules deletion of its stored artifacts.
    ///
    /// Removing the item currently generating is allowed: the in-flight
    /// attempt keeps running but its results are discarded, since the sink
    /// and completion paths no-op once the item is gone.
    pub async fn remove(&self, id: &ItemId) -> Result<(), ArtifexError> {
        {
            let mut items = self.inner.items.lock().await;
            let before = items.len();
            items.retain(|i| &i.id != id);
            if items.len() == before {
                return Err(ArtifexError::UnknownItem(id.to_string()));
            }
        }

        let blobs = Arc::clone(&self.inner.blobs);
        let id = id.clone();
        tokio::spawn(async move {
            if let Err(e) = blobs.delete(&id).await {
                warn!(item = %id, error = %e, "failed to delete stored artifacts");
            }
        });
        Ok(())
    }

    /// Snapshot of one item.
    pub async fn item(&self, id: &ItemId) -> Option<QueueItem> {
        self.inner
            .items
            .lock()
            .await
            .iter()
            .find(|i| &i.id == id)
            .cloned()
    }

    /// Snapshot of all items in arrival order.
    pub async fn items(&self) -> Vec<QueueItem> {
        self.inner.items.lock().await.clone()
    }

    /// Returns a completed item's final artifacts, loading them from the
    /// blob store if the in-memory cache was evicted.
    pub async fn hydrate_final(&self, id: &ItemId) -> Result<Vec<ImageData>, ArtifexError> {
        {
            let items = self.inner.items.lock().await;
            let item = items
                .iter()
                .find(|i| &i.id == id)
                .ok_or_else(|| ArtifexError::UnknownItem(id.to_string()))?;
            if let Some(images) = &item.final_images {
                return Ok(images.clone());
            }
        }

        let images = self.inner.blobs.load(id, ArtifactKind::Final).await?;
        let mut items = self.inner.items.lock().await;
        if let Some(item) = items.iter_mut().find(|i| &i.id == id) {
            item.final_images = Some(images.clone());
        }
        Ok(images)
    }

    /// Drops an item's in-memory image payloads; `final_count` and the blob
    /// store copies are unaffected.
    pub async fn evict_images(&self, id: &ItemId) -> Result<(), ArtifexError> {
        let mut items = self.inner.items.lock().await;
        let item = items
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| ArtifexError::UnknownItem(id.to_string()))?;
        item.final_images = None;
        item.interim_images.clear();
        Ok(())
    }

    /// Stops the worker. In-flight sleeps are interrupted; an item caught
    /// mid-attempt stays generating and is recovered on the next start.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.inner.notify.notify_one();
        if let Some(handle) = self.worker.lock().await.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "queue worker ended abnormally");
            }
        }
    }
}

/// Demotes interrupted generating items back to pending. Returns how many
/// items were demoted.
fn recover_items(items: &mut [QueueItem]) -> usize {
    let mut recovered = 0;
    for item in items.iter_mut() {
        if item.status == ItemStatus::Generating {
            item.status = ItemStatus::Pending;
            item.started_at = None;
            item.elapsed = std::time::Duration::ZERO;
            item.clear_attempt_state();
            recovered += 1;
        }
    }
    recovered
}

fn save_blobs_detached(
    blobs: Arc<dyn BlobStore>,
    id: ItemId,
    kind: ArtifactKind,
    images: Vec<ImageData>,
) {
    tokio::spawn(async move {
        if let Err(e) = blobs.save(&id, kind, &images).await {
            warn!(item = %id, kind = ?kind, error = %e, "failed to persist artifacts");
        }
    });
}

async fn worker_loop(inner: Arc<Inner>) {
    loop {
        // Arm the wakeup before scanning so a notify between scan and await
        // is not lost.
        let notified = inner.notify.notified();

        if inner.cancel.is_cancelled() {
            break;
        }

        let next = {
            let items = inner.items.lock().await;
            items
                .iter()
                .find(|i| i.status == ItemStatus::Pending)
                .map(|i| i.id.clone())
        };

        match next {
            Some(id) => process_item(&inner, id).await,
            None => {
                tokio::select! {
                    _ = notified => {}
                    _ = inner.cancel.cancelled() => break,
                }
            }
        }
    }
    debug!("queue worker stopped");
}

/// Drives one item through attempts until it settles or the queue shuts down.
async fn process_item(inner: &Arc<Inner>, id: ItemId) {
    let (request, config) = {
        let mut items = inner.items.lock().await;
        let Some(item) = items.iter_mut().find(|i| i.id == id) else {
            return;
        };
        item.mark_generating();
        (item.request.clone(), item.config.clone())
    };

    // The guard cancels the per-item token on every exit path, so the ticker
    // stops the moment the item settles instead of on its next tick.
    let ticker_cancel = inner.cancel.child_token();
    let _ticker_guard = ticker_cancel.clone().drop_guard();
    let _ticker = ticker::spawn(Arc::clone(&inner.items), id.clone(), ticker_cancel);

    let policy = RetryPolicy::for_provider(config.provider);
    let mut state = RetryState::default();
    let sink = ItemSink {
        items: Arc::clone(&inner.items),
        id: id.clone(),
    };

    loop {
        let outcome = inner
            .provider
            .generate(&config, &request, &sink)
            .await
            .and_then(|images| {
                if images.is_empty() {
                    Err(GenerationError::empty("provider returned no artifacts"))
                } else {
                    Ok(images)
                }
            });

        match outcome {
            Ok(images) => {
                // Persist only if the item survived the attempt; a removal
                // already deleted its blob directory and must stay deleted.
                let mut items = inner.items.lock().await;
                if let Some(item) = items.iter_mut().find(|i| i.id == id) {
                    save_blobs_detached(
                        Arc::clone(&inner.blobs),
                        id.clone(),
                        ArtifactKind::Final,
                        images.clone(),
                    );
                    item.mark_completed(images);
                    info!(item = %id, attempts = state.attempts + 1, "generation completed");
                }
                return;
            }
            Err(err) if !err.class.is_retryable() => {
                let mut items = inner.items.lock().await;
                if let Some(item) = items.iter_mut().find(|i| i.id == id) {
                    item.mark_error(&err.message);
                    warn!(item = %id, class = %err.class, "generation failed");
                }
                return;
            }
            Err(err) => {
                state.record_failure(err.class);
                if policy.exhausted(&state) {
                    let mut items = inner.items.lock().await;
                    if let Some(item) = items.iter_mut().find(|i| i.id == id) {
                        item.mark_error(MAX_RETRIES_MESSAGE);
                        warn!(
                            item = %id,
                            attempts = state.attempts,
                            class = %err.class,
                            "retry budget exhausted"
                        );
                    }
                    return;
                }

                let delay = policy.next_interval(&state);
                debug!(
                    item = %id,
                    class = %err.class,
                    attempt = state.attempts,
                    delay_secs = delay.as_secs(),
                    "attempt failed, will retry"
                );
                {
                    let mut items = inner.items.lock().await;
                    let Some(item) = items.iter_mut().find(|i| i.id == id) else {
                        return;
                    };
                    item.clear_attempt_state();
                    item.status_message = Some(format!("retrying: {}", err.message));
                }
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = inner.cancel.cancelled() => return,
                }
                // The item may have been removed during the backoff; a fresh
                // attempt would hold the single-flight slot for nothing.
                if !inner.items.lock().await.iter().any(|i| i.id == id) {
                    return;
                }
            }
        }
    }
}

/// Relays provider events into the owning item's state.
///
/// Every event re-checks that the item still exists and is still generating;
/// events arriving after removal or settlement are dropped.
struct ItemSink {
    items: Arc<Mutex<Vec<QueueItem>>>,
    id: ItemId,
}

impl ItemSink {
    async fn with_item(&self, f: impl FnOnce(&mut QueueItem)) {
        let mut items = self.items.lock().await;
        if let Some(item) = items
            .iter_mut()
            .find(|i| i.id == self.id && i.status == ItemStatus::Generating)
        {
            f(item);
        }
    }
}

#[async_trait]
impl GenerationSink for ItemSink {
    async fn thought(&self, text: &str) {
        self.with_item(|item| item.thoughts.push(text.to_string()))
            .await;
    }

    async fn interim_image(&self, image: ImageData) {
        self.with_item(|item| item.interim_images.push(image)).await;
    }

    async fn progress(&self, percent: u8, message: &str) {
        self.with_item(|item| item.record_progress(percent, message))
            .await;
    }
}
