//! News ingestion: URL, pasted text or image in, reviewable record out.
//!
//! The pipeline only reads. Persisting happens later, after an editor has
//! reviewed the record (see `NewsDocument::create_from_record`).

pub mod html;
pub mod language;
pub mod normalize;
pub mod prompt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::common::truncate_chars;
use crate::domains::news::models::NewsCategory;
use crate::kernel::{AiError, BaseAI, BasePageFetcher, FetchError};

pub use html::{extract_page, ScrapedPage};
pub use language::{detect_language, language_code};
pub use normalize::{fallback_record, normalize_response, Normalized};

/// Body text beyond this many characters is not sent to the model
pub const MAX_BODY_CHARS: usize = 5000;

/// Tag given to records the model did not tag
pub const DEFAULT_TAG: &str = "뉴스";

/// User-facing message for any model failure
pub const AI_FAILURE_MESSAGE: &str = "AI 분석에 실패했습니다. 잠시 후 다시 시도해주세요.";

#[derive(Debug, Clone)]
pub enum IngestSource {
    Url(String),
    Text {
        text: String,
        hint_title: Option<String>,
    },
    Image {
        bytes: Vec<u8>,
        mime_type: String,
        hint_title: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("AI 분석에 실패했습니다. 잠시 후 다시 시도해주세요.")]
    Ai(#[from] AiError),

    #[error("nothing to ingest: source is empty")]
    EmptySource,
}

/// Content record ready for review, in the shape editors see and publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub title: String,
    pub summary: String,
    pub content: String,
    #[serde(default)]
    pub category: NewsCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub author: Option<String>,
    pub language: String,
}

impl NormalizedRecord {
    /// Anything not originally Korean was translated by the model.
    pub fn is_translated(&self) -> bool {
        self.language != "ko"
    }
}

/// Scraped fields used both for the prompt and for the fallback record.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedContext {
    pub title: String,
    pub description: String,
    /// Body text, already truncated to [`MAX_BODY_CHARS`]
    pub text: String,
    pub language: String,
    pub source_url: Option<String>,
}

impl ScrapedContext {
    fn new(title: String, description: String, text: &str, source_url: Option<String>) -> Self {
        let text = truncate_chars(text, MAX_BODY_CHARS).to_string();
        let language = detect_language(&format!("{title} {text}")).to_string();
        Self {
            title,
            description,
            text,
            language,
            source_url,
        }
    }
}

/// Output of one ingestion run.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    pub record: NormalizedRecord,
    pub used_fallback: bool,
    pub source_url: Option<String>,
    /// `og:image` of the fetched page, when there was one
    pub image_url: Option<String>,
}

#[instrument(skip_all, fields(kind = source_kind(&source)))]
pub async fn ingest(
    source: IngestSource,
    fetcher: &dyn BasePageFetcher,
    ai: &dyn BaseAI,
) -> Result<IngestOutcome, IngestError> {
    match source {
        IngestSource::Url(url) => {
            let page = fetcher.fetch(&url).await?;
            let scraped = extract_page(&page.html);
            let image_url = Some(scraped.image_url).filter(|u| !u.is_empty());
            let ctx = ScrapedContext::new(
                scraped.title,
                scraped.description,
                &scraped.text,
                Some(page.url),
            );
            let outcome = analyze_text(&ctx, ai).await?;
            Ok(IngestOutcome {
                source_url: ctx.source_url,
                image_url,
                ..outcome
            })
        }
        IngestSource::Text { text, hint_title } => {
            if text.trim().is_empty() {
                return Err(IngestError::EmptySource);
            }
            let ctx = ScrapedContext::new(hint_title.unwrap_or_default(), String::new(), &text, None);
            analyze_text(&ctx, ai).await
        }
        IngestSource::Image {
            bytes,
            mime_type,
            hint_title,
        } => {
            if bytes.is_empty() {
                return Err(IngestError::EmptySource);
            }
            let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes));
            let ctx = ScrapedContext {
                title: String::new(),
                description: String::new(),
                text: String::new(),
                language: language::DEFAULT_LANGUAGE.to_string(),
                source_url: None,
            };
            let raw = ai
                .complete_json_with_image(
                    &prompt::system_prompt(),
                    &prompt::image_prompt(hint_title.as_deref()),
                    &data_url,
                )
                .await?;
            Ok(finish(&raw, &ctx))
        }
    }
}

async fn analyze_text(ctx: &ScrapedContext, ai: &dyn BaseAI) -> Result<IngestOutcome, IngestError> {
    let raw = ai
        .complete_json(&prompt::system_prompt(), &prompt::article_prompt(ctx))
        .await?;
    Ok(finish(&raw, ctx))
}

fn finish(raw: &str, ctx: &ScrapedContext) -> IngestOutcome {
    let Normalized {
        record,
        used_fallback,
    } = normalize_response(raw, ctx);

    info!(
        category = %record.category,
        language = %record.language,
        tags = record.tags.len(),
        used_fallback,
        "Normalized news record"
    );

    IngestOutcome {
        record,
        used_fallback,
        source_url: ctx.source_url.clone(),
        image_url: None,
    }
}

fn source_kind(source: &IngestSource) -> &'static str {
    match source {
        IngestSource::Url(_) => "url",
        IngestSource::Text { .. } => "text",
        IngestSource::Image { .. } => "image",
    }
}
