use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::category::NewsCategory;
use super::taxonomy::{CategoryRow, TagRow};
use crate::common::NewsId;
use crate::domains::news::ingestion::NormalizedRecord;

/// Stored news article.
///
/// Created once from a reviewed [`NormalizedRecord`]; afterwards only
/// `view_count` changes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NewsDocument {
    pub id: NewsId,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub language: String,
    pub is_translated: bool,
    /// Category name, joined from `news_categories`
    pub category: String,
    pub author: Option<String>,
    pub source_url: Option<String>,
    pub image_url: Option<String>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const SELECT_DOCUMENT: &str = r#"
    SELECT
        d.id,
        d.title,
        d.summary,
        d.content,
        d.language,
        d.is_translated,
        c.name AS category,
        d.author,
        d.source_url,
        d.image_url,
        d.view_count,
        d.created_at,
        d.updated_at
    FROM news_documents d
    INNER JOIN news_categories c ON c.id = d.category_id
"#;

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl NewsDocument {
    /// Persist a reviewed record, creating its category and tags on demand.
    pub async fn create_from_record(
        record: &NormalizedRecord,
        source_url: Option<&str>,
        image_url: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        let mut tx = pool.begin().await.context("Failed to open transaction")?;

        let category = CategoryRow::find_or_create(record.category.as_str(), &mut tx).await?;

        let id = NewsId::new();
        sqlx::query(
            r#"
            INSERT INTO news_documents (
                id,
                title,
                summary,
                content,
                language,
                is_translated,
                category_id,
                author,
                source_url,
                image_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(id)
        .bind(&record.title)
        .bind(&record.summary)
        .bind(&record.content)
        .bind(&record.language)
        .bind(record.is_translated())
        .bind(category.id)
        .bind(&record.author)
        .bind(source_url)
        .bind(image_url)
        .execute(&mut *tx)
        .await?;

        for name in &record.tags {
            let tag = TagRow::find_or_create(name, &mut tx).await?;
            TagRow::attach(id, tag.id, &mut tx).await?;
        }

        tx.commit().await.context("Failed to commit news document")?;

        Self::find_by_id(id, pool)
            .await?
            .context("News document vanished after insert")
    }

    pub async fn find_by_id(id: NewsId, pool: &PgPool) -> Result<Option<Self>> {
        let doc = sqlx::query_as::<_, NewsDocument>(&format!("{SELECT_DOCUMENT} WHERE d.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(doc)
    }

    /// Newest first, optionally restricted to one category.
    pub async fn list(
        category: Option<NewsCategory>,
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let docs = sqlx::query_as::<_, NewsDocument>(&format!(
            "{SELECT_DOCUMENT}
             WHERE ($1::text IS NULL OR c.name = $1)
             ORDER BY d.created_at DESC, d.id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(category.map(|c| c.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
        Ok(docs)
    }

    /// Add an aggregated batch of views.
    pub async fn add_views(id: NewsId, count: i64, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE news_documents SET view_count = view_count + $2 WHERE id = $1")
            .bind(id)
            .bind(count.max(0))
            .execute(pool)
            .await?;
        Ok(())
    }
}
