//! Batched view counting.
//!
//! Detail pages call [`ViewCountBuffer::record`] instead of writing a row per
//! view. Increments accumulate in memory and are written as one aggregated
//! `+n` per target on [`ViewCountBuffer::flush`]. Pending increments are lost
//! if the process dies before a flush; view counts are analytics only.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::common::{EntryId, NewsId};
use crate::domains::directory::models::DirectoryEntry;
use crate::domains::news::models::NewsDocument;

/// What a buffered view belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewTarget {
    Entry(EntryId),
    News(NewsId),
}

/// Destination for aggregated increments.
#[async_trait]
pub trait ViewCountSink: Send + Sync {
    async fn add_views(&self, target: ViewTarget, count: i64) -> Result<()>;
}

/// Outcome of one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Targets whose increment was written
    pub written: usize,
    /// Targets whose write failed; their increments are discarded
    pub dropped: usize,
}

#[derive(Clone, Default)]
pub struct ViewCountBuffer {
    pending: Arc<Mutex<HashMap<ViewTarget, i64>>>,
}

impl ViewCountBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, target: ViewTarget) {
        let mut pending = self.lock();
        *pending.entry(target).or_insert(0) += 1;
    }

    /// Snapshot of everything waiting to be flushed.
    pub fn pending(&self) -> HashMap<ViewTarget, i64> {
        self.lock().clone()
    }

    /// Increments waiting for `target`.
    pub fn pending_for(&self, target: ViewTarget) -> i64 {
        self.lock().get(&target).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drain the buffer and write one aggregated increment per target.
    ///
    /// Each target is written independently; a failed write is logged and its
    /// increments are dropped rather than re-queued.
    pub async fn flush(&self, sink: &dyn ViewCountSink) -> FlushReport {
        let batch = std::mem::take(&mut *self.lock());
        if batch.is_empty() {
            return FlushReport::default();
        }

        let mut report = FlushReport::default();
        for (target, count) in batch {
            match sink.add_views(target, count).await {
                Ok(()) => report.written += 1,
                Err(e) => {
                    warn!(?target, count, error = %e, "Dropping buffered view increments");
                    report.dropped += 1;
                }
            }
        }

        debug!(
            written = report.written,
            dropped = report.dropped,
            "Flushed view counts"
        );
        report
    }

    /// Flush on a fixed interval until the returned handle is shut down.
    ///
    /// Shutting down performs one last flush before the task exits.
    pub fn spawn_flush_loop(
        &self,
        sink: Arc<dyn ViewCountSink>,
        interval: Duration,
    ) -> FlushLoopHandle {
        let buffer = self.clone();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        buffer.flush(sink.as_ref()).await;
                    }
                    _ = &mut shutdown_rx => {
                        let report = buffer.flush(sink.as_ref()).await;
                        info!(written = report.written, "View count flush loop stopped");
                        break;
                    }
                }
            }
        });

        FlushLoopHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ViewTarget, i64>> {
        // A poisoned map still holds valid counts
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Owner of a running flush loop.
pub struct FlushLoopHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl FlushLoopHandle {
    /// Stop the loop and wait for its final flush.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!(error = %e, "View count flush task ended abnormally");
        }
    }
}

/// Postgres sink writing straight into the counter columns.
pub struct PgViewCountSink {
    pool: PgPool,
}

impl PgViewCountSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ViewCountSink for PgViewCountSink {
    async fn add_views(&self, target: ViewTarget, count: i64) -> Result<()> {
        match target {
            ViewTarget::Entry(id) => DirectoryEntry::add_views(id, count, &self.pool).await,
            ViewTarget::News(id) => NewsDocument::add_views(id, count, &self.pool).await,
        }
    }
}
