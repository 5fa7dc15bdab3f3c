//! News operations used by the HTTP layer.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use super::ingestion::{ingest, IngestError, IngestOutcome, IngestSource, NormalizedRecord};
use super::models::{NewsCategory, NewsDocument, TagRow};
use crate::common::NewsId;
use crate::kernel::{ServerDeps, ViewTarget};

/// Largest page the listing will return
pub const MAX_NEWS_PAGE: i64 = 100;

pub async fn list_news(
    category: Option<NewsCategory>,
    limit: i64,
    offset: i64,
    deps: &ServerDeps,
) -> Result<Vec<NewsDocument>> {
    NewsDocument::list(
        category,
        limit.clamp(1, MAX_NEWS_PAGE),
        offset.max(0),
        &deps.db_pool,
    )
    .await
}

/// Article with its tag names.
#[derive(Debug, Clone, Serialize)]
pub struct NewsDetail {
    #[serde(flatten)]
    pub document: NewsDocument,
    pub tags: Vec<String>,
}

/// Detail view; queues a view increment when the article exists.
pub async fn get_news(id: NewsId, deps: &ServerDeps) -> Result<Option<NewsDetail>> {
    let Some(document) = NewsDocument::find_by_id(id, &deps.db_pool).await? else {
        return Ok(None);
    };
    deps.view_buffer.record(ViewTarget::News(id));
    let tags = TagRow::find_names_for_news(id, &deps.db_pool).await?;
    Ok(Some(NewsDetail { document, tags }))
}

/// Run ingestion for an editor. Nothing is stored.
pub async fn ingest_preview(
    source: IngestSource,
    deps: &ServerDeps,
) -> Result<IngestOutcome, IngestError> {
    ingest(source, deps.page_fetcher.as_ref(), deps.ai.as_ref()).await
}

/// Store a reviewed record.
pub async fn publish(
    record: &NormalizedRecord,
    source_url: Option<&str>,
    image_url: Option<&str>,
    deps: &ServerDeps,
) -> Result<NewsDetail> {
    let document =
        NewsDocument::create_from_record(record, source_url, image_url, &deps.db_pool).await?;
    info!(news_id = %document.id, category = %document.category, "Published news document");
    let tags = TagRow::find_names_for_news(document.id, &deps.db_pool).await?;
    Ok(NewsDetail { document, tags })
}

pub fn list_categories() -> &'static [NewsCategory] {
    &NewsCategory::ALL
}
