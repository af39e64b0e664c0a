// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Elapsed-time ticker: keeps a generating item's wall clock current so
//! observers see time advance even when the provider is silent.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use artifex_core::ItemId;

use crate::item::{ItemStatus, QueueItem};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Spawns a task that refreshes `elapsed` on the given item four times a
/// second. The task exits on its own when the item leaves the generating
/// state or disappears, or when the queue shuts down.
pub(crate) fn spawn(
    items: Arc<Mutex<Vec<QueueItem>>>,
    id: ItemId,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let started = Instant::now();
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }
            let mut items = items.lock().await;
            let Some(item) = items.iter_mut().find(|i| i.id == id) else {
                break;
            };
            if item.status != ItemStatus::Generating {
                break;
            }
            item.elapsed = started.elapsed();
        }
        trace!(item = %id, "elapsed ticker stopped");
    })
}
