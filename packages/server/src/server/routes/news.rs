use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;

use crate::common::NewsId;
use crate::domains::news::actions::{self, NewsDetail};
use crate::domains::news::{NewsCategory, NewsDocument};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};

const DEFAULT_NEWS_PAGE: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct NewsListQuery {
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/news?category=&limit=&offset=
///
/// `category` goes through the same coercion as model output, so an unknown
/// name lists 기타.
pub async fn list_news_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<NewsListQuery>,
) -> ApiResult<Json<Vec<NewsDocument>>> {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(NewsCategory::coerce);

    let docs = actions::list_news(
        category,
        query.limit.unwrap_or(DEFAULT_NEWS_PAGE),
        query.offset.unwrap_or(0),
        &state.deps,
    )
    .await?;
    Ok(Json(docs))
}

/// GET /api/news/:id
pub async fn get_news_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<NewsId>,
) -> ApiResult<Json<NewsDetail>> {
    let detail = actions::get_news(id, &state.deps)
        .await?
        .ok_or(ApiError::NotFound("news document"))?;
    Ok(Json(detail))
}

/// GET /api/news/categories
pub async fn list_categories_handler() -> Json<Vec<NewsCategory>> {
    Json(actions::list_categories().to_vec())
}
