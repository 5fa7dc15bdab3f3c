//! Directory operations used by the HTTP layer.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use super::exposure::{record_exposures, ExposureReport, ExposureStore};
use super::models::{DirectoryEntry, EntryTier, NewDirectoryEntry};
use super::ranking::{rank_entries, RankingConfig};
use crate::common::EntryId;
use crate::kernel::{ServerDeps, ViewTarget};

/// Rank every card and keep the first `limit`.
pub fn select_for_display(
    entries: Vec<DirectoryEntry>,
    limit: usize,
    now: DateTime<Utc>,
    config: &RankingConfig,
) -> Vec<DirectoryEntry> {
    let mut ranked = rank_entries(entries, now, config);
    ranked.truncate(limit);
    ranked
}

/// Record exposures in the background; the caller does not wait.
pub fn schedule_exposures(
    store: Arc<dyn ExposureStore>,
    ids: Vec<EntryId>,
    at: DateTime<Utc>,
) -> JoinHandle<ExposureReport> {
    tokio::spawn(async move { record_exposures(store.as_ref(), &ids, at).await })
}

/// Public listing: ranked cards, with exposure bookkeeping fired off after.
pub async fn list_ranked(limit: i64, deps: &ServerDeps) -> Result<Vec<DirectoryEntry>> {
    let entries = DirectoryEntry::find_all(&deps.db_pool).await?;
    let now = Utc::now();
    let shown = select_for_display(entries, limit.max(0) as usize, now, &deps.ranking);

    if !shown.is_empty() {
        let ids = shown.iter().map(|e| e.id).collect();
        schedule_exposures(deps.exposure_store.clone(), ids, now);
    }

    Ok(shown)
}

/// Detail view; queues a view increment when the card exists.
pub async fn get_entry(id: EntryId, deps: &ServerDeps) -> Result<Option<DirectoryEntry>> {
    let entry = DirectoryEntry::find_by_id(id, &deps.db_pool).await?;
    if entry.is_some() {
        deps.view_buffer.record(ViewTarget::Entry(id));
    }
    Ok(entry)
}

// =============================================================================
// Admin operations
// =============================================================================

pub async fn create_entry(input: NewDirectoryEntry, deps: &ServerDeps) -> Result<DirectoryEntry> {
    let entry = DirectoryEntry::create(input, &deps.db_pool).await?;
    info!(entry_id = %entry.id, tier = %entry.tier, "Directory entry created");
    Ok(entry)
}

/// Callers validate the range with [`DirectoryEntry::is_valid_weight`].
pub async fn update_weight(
    id: EntryId,
    weight: f64,
    deps: &ServerDeps,
) -> Result<Option<DirectoryEntry>> {
    let entry = DirectoryEntry::update_weight(id, weight, &deps.db_pool).await?;
    if entry.is_some() {
        info!(entry_id = %id, weight, "Exposure weight updated");
    }
    Ok(entry)
}

pub async fn set_tier(
    id: EntryId,
    tier: EntryTier,
    premium_expires_at: Option<DateTime<Utc>>,
    deps: &ServerDeps,
) -> Result<Option<DirectoryEntry>> {
    let entry = DirectoryEntry::update_tier(id, tier, premium_expires_at, &deps.db_pool).await?;
    if entry.is_some() {
        info!(entry_id = %id, %tier, "Directory tier changed");
    }
    Ok(entry)
}

pub async fn reset_counters(id: EntryId, deps: &ServerDeps) -> Result<Option<DirectoryEntry>> {
    let entry = DirectoryEntry::reset_counters(id, &deps.db_pool).await?;
    if entry.is_some() {
        info!(entry_id = %id, "Directory counters reset");
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MockExposureStore;

    fn entry(name: &str, tier: EntryTier, exposures: i64) -> DirectoryEntry {
        let now = Utc::now();
        DirectoryEntry {
            id: EntryId::new(),
            name: name.to_string(),
            description: None,
            category: None,
            address: None,
            phone: None,
            website_url: None,
            image_url: None,
            tier,
            premium_expires_at: None,
            view_count: 0,
            exposure_count: exposures,
            last_exposed_at: None,
            exposure_weight: 1.0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_select_truncates_after_ranking() {
        let entries = vec![
            entry("r-old", EntryTier::Regular, 50),
            entry("p", EntryTier::Premium, 0),
            entry("r-new", EntryTier::Regular, 0),
        ];
        let shown = select_for_display(entries, 2, Utc::now(), &RankingConfig::default());
        let names: Vec<_> = shown.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["p", "r-new"]);
    }

    #[tokio::test]
    async fn test_scheduled_exposures_cover_every_id() {
        let store = Arc::new(MockExposureStore::new());
        let ids = vec![EntryId::new(), EntryId::new()];

        let report = schedule_exposures(store.clone(), ids.clone(), Utc::now())
            .await
            .unwrap();

        assert_eq!(report.recorded, 2);
        assert_eq!(store.recorded_ids(), ids);
    }
}
