use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::EntryId;

/// Lowest exposure weight an admin may set
pub const MIN_EXPOSURE_WEIGHT: f64 = 0.1;
/// Highest exposure weight an admin may set
pub const MAX_EXPOSURE_WEIGHT: f64 = 10.0;

/// Listing tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "entry_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntryTier {
    Premium,
    Regular,
}

impl std::fmt::Display for EntryTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryTier::Premium => write!(f, "premium"),
            EntryTier::Regular => write!(f, "regular"),
        }
    }
}

/// DirectoryEntry - one business card in the directory
///
/// Exposure Tracking:
/// - `exposure_count` / `last_exposed_at`: bumped every time the card is part
///   of a rendered listing; feeds the fairness score in `ranking`
/// - `view_count`: bumped (through the view buffer) when the detail page opens
///
/// Counters only grow; `reset_counters` is the one administrative exception.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DirectoryEntry {
    pub id: EntryId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website_url: Option<String>,
    pub image_url: Option<String>,
    pub tier: EntryTier,
    pub premium_expires_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub exposure_count: i64,
    pub last_exposed_at: Option<DateTime<Utc>>,
    pub exposure_weight: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields an admin supplies when adding a card
#[derive(Debug, Clone, Deserialize)]
pub struct NewDirectoryEntry {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website_url: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_tier")]
    pub tier: EntryTier,
    pub premium_expires_at: Option<DateTime<Utc>>,
}

fn default_tier() -> EntryTier {
    EntryTier::Regular
}

impl DirectoryEntry {
    /// Premium and not past its expiry. Display-only; ranking ignores it.
    pub fn is_premium_active(&self, now: DateTime<Utc>) -> bool {
        self.tier == EntryTier::Premium
            && self.premium_expires_at.map_or(true, |expires| expires > now)
    }

    /// Whether `weight` is inside the admin bounds.
    pub fn is_valid_weight(weight: f64) -> bool {
        weight.is_finite() && (MIN_EXPOSURE_WEIGHT..=MAX_EXPOSURE_WEIGHT).contains(&weight)
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl DirectoryEntry {
    pub async fn create(input: NewDirectoryEntry, pool: &PgPool) -> Result<Self> {
        let entry = sqlx::query_as::<_, DirectoryEntry>(
            r#"
            INSERT INTO directory_entries (
                id,
                name,
                description,
                category,
                address,
                phone,
                website_url,
                image_url,
                tier,
                premium_expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(EntryId::new())
        .bind(input.name)
        .bind(input.description)
        .bind(input.category)
        .bind(input.address)
        .bind(input.phone)
        .bind(input.website_url)
        .bind(input.image_url)
        .bind(input.tier)
        .bind(input.premium_expires_at)
        .fetch_one(pool)
        .await?;
        Ok(entry)
    }

    pub async fn find_by_id(id: EntryId, pool: &PgPool) -> Result<Option<Self>> {
        let entry =
            sqlx::query_as::<_, DirectoryEntry>("SELECT * FROM directory_entries WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(entry)
    }

    /// All cards, oldest first. Insertion order is the ranking tie-breaker.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let entries = sqlx::query_as::<_, DirectoryEntry>(
            "SELECT * FROM directory_entries ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(entries)
    }

    /// Count one display of a card.
    pub async fn record_exposure(id: EntryId, at: DateTime<Utc>, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE directory_entries
            SET exposure_count = exposure_count + 1,
                last_exposed_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Add an aggregated batch of detail views.
    pub async fn add_views(id: EntryId, count: i64, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE directory_entries SET view_count = view_count + $2 WHERE id = $1")
            .bind(id)
            .bind(count.max(0))
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn update_weight(id: EntryId, weight: f64, pool: &PgPool) -> Result<Option<Self>> {
        let entry = sqlx::query_as::<_, DirectoryEntry>(
            r#"
            UPDATE directory_entries
            SET exposure_weight = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(weight)
        .fetch_optional(pool)
        .await?;
        Ok(entry)
    }

    pub async fn update_tier(
        id: EntryId,
        tier: EntryTier,
        premium_expires_at: Option<DateTime<Utc>>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let entry = sqlx::query_as::<_, DirectoryEntry>(
            r#"
            UPDATE directory_entries
            SET tier = $2, premium_expires_at = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(tier)
        .bind(premium_expires_at)
        .fetch_optional(pool)
        .await?;
        Ok(entry)
    }

    /// Zero both counters and forget the last exposure.
    pub async fn reset_counters(id: EntryId, pool: &PgPool) -> Result<Option<Self>> {
        let entry = sqlx::query_as::<_, DirectoryEntry>(
            r#"
            UPDATE directory_entries
            SET view_count = 0,
                exposure_count = 0,
                last_exposed_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(entry)
    }
}
