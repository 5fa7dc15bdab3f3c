use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::common::EntryId;
use crate::domains::auth::ADMIN_TOKEN_HOURS;
use crate::domains::directory::{
    actions as directory, DirectoryEntry, EntryTier, NewDirectoryEntry, MAX_EXPOSURE_WEIGHT,
    MIN_EXPOSURE_WEIGHT,
};
use crate::domains::news::actions::{self as news, NewsDetail};
use crate::domains::news::ingestion::language_code;
use crate::domains::news::{IngestSource, NormalizedRecord};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};

// =============================================================================
// Login
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

/// POST /api/admin/login
pub async fn login_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    if !state.admin_password.verify(&body.password) {
        warn!("Rejected admin login");
        return Err(ApiError::Unauthorized);
    }

    let token = state.jwt_service.create_admin_token()?;
    info!("Admin logged in");
    Ok(Json(LoginResponse {
        token,
        expires_in: ADMIN_TOKEN_HOURS * 3600,
    }))
}

// =============================================================================
// Directory administration
// =============================================================================

/// POST /api/admin/directory
pub async fn create_entry_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<NewDirectoryEntry>,
) -> ApiResult<(StatusCode, Json<DirectoryEntry>)> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    let entry = directory::create_entry(body, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Debug, Deserialize)]
pub struct WeightRequest {
    pub weight: f64,
}

/// PUT /api/admin/directory/:id/weight
pub async fn update_weight_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<EntryId>,
    Json(body): Json<WeightRequest>,
) -> ApiResult<Json<DirectoryEntry>> {
    if !DirectoryEntry::is_valid_weight(body.weight) {
        return Err(ApiError::BadRequest(format!(
            "weight must be between {MIN_EXPOSURE_WEIGHT} and {MAX_EXPOSURE_WEIGHT}"
        )));
    }
    let entry = directory::update_weight(id, body.weight, &state.deps)
        .await?
        .ok_or(ApiError::NotFound("directory entry"))?;
    Ok(Json(entry))
}

#[derive(Debug, Deserialize)]
pub struct TierRequest {
    pub tier: EntryTier,
    pub premium_expires_at: Option<DateTime<Utc>>,
}

/// PUT /api/admin/directory/:id/tier
pub async fn set_tier_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<EntryId>,
    Json(body): Json<TierRequest>,
) -> ApiResult<Json<DirectoryEntry>> {
    // Expiry only means something for premium cards
    let expires = match body.tier {
        EntryTier::Premium => body.premium_expires_at,
        EntryTier::Regular => None,
    };
    let entry = directory::set_tier(id, body.tier, expires, &state.deps)
        .await?
        .ok_or(ApiError::NotFound("directory entry"))?;
    Ok(Json(entry))
}

/// POST /api/admin/directory/:id/reset
pub async fn reset_counters_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<EntryId>,
) -> ApiResult<Json<DirectoryEntry>> {
    let entry = directory::reset_counters(id, &state.deps)
        .await?
        .ok_or(ApiError::NotFound("directory entry"))?;
    Ok(Json(entry))
}

// =============================================================================
// News administration
// =============================================================================

/// Body of POST /api/admin/news/ingest
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IngestRequest {
    Url {
        url: String,
    },
    Text {
        text: String,
        title: Option<String>,
    },
    Image {
        /// Base64 image bytes, without a `data:` prefix
        data: String,
        mime_type: String,
        title: Option<String>,
    },
}

impl IngestRequest {
    fn into_source(self) -> ApiResult<IngestSource> {
        match self {
            IngestRequest::Url { url } => {
                if url.trim().is_empty() {
                    return Err(ApiError::BadRequest("url is required".to_string()));
                }
                Ok(IngestSource::Url(url.trim().to_string()))
            }
            IngestRequest::Text { text, title } => Ok(IngestSource::Text {
                text,
                hint_title: title,
            }),
            IngestRequest::Image {
                data,
                mime_type,
                title,
            } => {
                if !mime_type.starts_with("image/") {
                    return Err(ApiError::BadRequest(format!(
                        "unsupported mime type: {mime_type}"
                    )));
                }
                let bytes = STANDARD
                    .decode(data.trim())
                    .map_err(|e| ApiError::BadRequest(format!("invalid base64 image: {e}")))?;
                Ok(IngestSource::Image {
                    bytes,
                    mime_type,
                    hint_title: title,
                })
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IngestPreviewResponse {
    pub record: NormalizedRecord,
    /// True when the model output was unusable and the record was built from
    /// scraped fields only
    pub used_fallback: bool,
    pub source_url: Option<String>,
    pub image_url: Option<String>,
}

/// POST /api/admin/news/ingest
pub async fn ingest_news_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<IngestRequest>,
) -> ApiResult<Json<IngestPreviewResponse>> {
    let source = body.into_source()?;
    let outcome = news::ingest_preview(source, &state.deps).await?;
    Ok(Json(IngestPreviewResponse {
        record: outcome.record,
        used_fallback: outcome.used_fallback,
        source_url: outcome.source_url,
        image_url: outcome.image_url,
    }))
}

/// Body of POST /api/admin/news: a reviewed record plus where it came from
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    #[serde(flatten)]
    pub record: NormalizedRecord,
    pub source_url: Option<String>,
    pub image_url: Option<String>,
}

/// POST /api/admin/news
pub async fn publish_news_handler(
    Extension(state): Extension<AppState>,
    Json(mut body): Json<PublishRequest>,
) -> ApiResult<(StatusCode, Json<NewsDetail>)> {
    if body.record.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }
    body.record.language = language_code(&body.record.language)
        .ok_or_else(|| {
            ApiError::BadRequest(format!("unsupported language: {}", body.record.language))
        })?
        .to_string();
    let detail = news::publish(
        &body.record,
        body.source_url.as_deref(),
        body.image_url.as_deref(),
        &state.deps,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}
