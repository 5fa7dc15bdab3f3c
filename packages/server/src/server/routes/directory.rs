use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::common::EntryId;
use crate::domains::directory::{actions, DirectoryEntry};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct DirectoryListQuery {
    pub limit: Option<i64>,
}

/// Card as shown publicly: the stored row plus whether premium is in effect.
#[derive(Debug, Serialize)]
pub struct DirectoryCard {
    #[serde(flatten)]
    pub entry: DirectoryEntry,
    pub premium_active: bool,
}

impl From<DirectoryEntry> for DirectoryCard {
    fn from(entry: DirectoryEntry) -> Self {
        let premium_active = entry.is_premium_active(chrono::Utc::now());
        Self {
            entry,
            premium_active,
        }
    }
}

/// GET /api/directory?limit=
pub async fn list_directory_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<DirectoryListQuery>,
) -> ApiResult<Json<Vec<DirectoryCard>>> {
    let limit = query
        .limit
        .unwrap_or(state.directory_page_limit)
        .clamp(0, state.directory_page_limit);

    let entries = actions::list_ranked(limit, &state.deps).await?;
    Ok(Json(entries.into_iter().map(DirectoryCard::from).collect()))
}

/// GET /api/directory/:id
pub async fn get_directory_entry_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<EntryId>,
) -> ApiResult<Json<DirectoryCard>> {
    let entry = actions::get_entry(id, &state.deps)
        .await?
        .ok_or(ApiError::NotFound("directory entry"))?;
    Ok(Json(entry.into()))
}
