//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use portal_core::domains::directory::{DirectoryEntry, EntryTier, NewDirectoryEntry};
use portal_core::domains::news::{NewsCategory, NormalizedRecord};
use sqlx::PgPool;

/// Create a directory card with the given tier and default counters
pub async fn create_test_entry(pool: &PgPool, name: &str, tier: EntryTier) -> Result<DirectoryEntry> {
    DirectoryEntry::create(
        NewDirectoryEntry {
            name: name.to_string(),
            description: Some(format!("{name} description")),
            category: Some("restaurant".to_string()),
            address: Some("Sukhumvit Soi 12, Bangkok".to_string()),
            phone: None,
            website_url: None,
            image_url: None,
            tier,
            premium_expires_at: None,
        },
        pool,
    )
    .await
}

/// A reviewed record ready to publish
pub fn test_record(title: &str, category: NewsCategory, tags: &[&str]) -> NormalizedRecord {
    NormalizedRecord {
        title: title.to_string(),
        summary: format!("{title} 요약"),
        content: format!("{title} 본문"),
        category,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        author: None,
        language: "th".to_string(),
    }
}
