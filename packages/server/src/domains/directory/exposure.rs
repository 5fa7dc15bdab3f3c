//! Exposure bookkeeping after a listing has been rendered.
//!
//! Every displayed card is updated on its own. There is no transaction over
//! the batch: one failed update is logged and the rest still go through.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, warn};

use super::models::DirectoryEntry;
use crate::common::EntryId;

#[async_trait]
pub trait ExposureStore: Send + Sync {
    /// Increment the exposure counter and stamp `last_exposed_at`.
    async fn record_exposure(&self, id: EntryId, at: DateTime<Utc>) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExposureReport {
    pub recorded: usize,
    pub failed: Vec<EntryId>,
}

/// Record one exposure for each id, independently.
pub async fn record_exposures(
    store: &dyn ExposureStore,
    ids: &[EntryId],
    at: DateTime<Utc>,
) -> ExposureReport {
    let mut report = ExposureReport::default();

    for &id in ids {
        match store.record_exposure(id, at).await {
            Ok(()) => report.recorded += 1,
            Err(e) => {
                warn!(entry_id = %id, error = %e, "Failed to record exposure");
                report.failed.push(id);
            }
        }
    }

    debug!(
        recorded = report.recorded,
        failed = report.failed.len(),
        "Recorded directory exposures"
    );
    report
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgExposureStore {
    pool: PgPool,
}

impl PgExposureStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExposureStore for PgExposureStore {
    async fn record_exposure(&self, id: EntryId, at: DateTime<Utc>) -> Result<()> {
        DirectoryEntry::record_exposure(id, at, &self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MockExposureStore;

    #[tokio::test]
    async fn test_one_failure_does_not_stop_the_batch() {
        let ids: Vec<EntryId> = (0..4).map(|_| EntryId::new()).collect();
        let store = MockExposureStore::new().failing_for(ids[1]);

        let report = record_exposures(&store, &ids, Utc::now()).await;

        assert_eq!(report.recorded, 3);
        assert_eq!(report.failed, vec![ids[1]]);
        assert_eq!(store.recorded_ids(), vec![ids[0], ids[2], ids[3]]);
    }

    #[tokio::test]
    async fn test_stamps_the_given_time() {
        let id = EntryId::new();
        let at = Utc::now();
        let store = MockExposureStore::new();

        record_exposures(&store, &[id], at).await;

        assert_eq!(store.calls(), vec![(id, at)]);
    }
}
