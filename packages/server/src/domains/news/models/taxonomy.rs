use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};

use crate::common::{CategoryId, NewsId, TagId};

/// Category row, created on demand by name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Tag row, created on demand by name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TagRow {
    pub id: TagId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Find-or-create
//
// Single INSERT .. ON CONFLICT .. RETURNING against UNIQUE(name); concurrent
// callers with the same new name get the same row. Names match exactly
// (case-sensitive).
// =============================================================================

impl CategoryRow {
    pub async fn find_or_create(name: &str, tx: &mut Transaction<'_, Postgres>) -> Result<Self> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO news_categories (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING *
            "#,
        )
        .bind(CategoryId::new())
        .bind(name)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, CategoryRow>("SELECT * FROM news_categories ORDER BY name")
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }
}

impl TagRow {
    pub async fn find_or_create(name: &str, tx: &mut Transaction<'_, Postgres>) -> Result<Self> {
        let row = sqlx::query_as::<_, TagRow>(
            r#"
            INSERT INTO news_tags (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING *
            "#,
        )
        .bind(TagId::new())
        .bind(name)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row)
    }

    /// Link a tag to a document; linking twice is a no-op.
    pub async fn attach(
        news_id: NewsId,
        tag_id: TagId,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO news_document_tags (news_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT (news_id, tag_id) DO NOTHING
            "#,
        )
        .bind(news_id)
        .bind(tag_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn find_names_for_news(news_id: NewsId, pool: &PgPool) -> Result<Vec<String>> {
        let names: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT t.name
            FROM news_tags t
            INNER JOIN news_document_tags ndt ON ndt.tag_id = t.id
            WHERE ndt.news_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(news_id)
        .fetch_all(pool)
        .await?;
        Ok(names.into_iter().map(|(name,)| name).collect())
    }
}
