//! Turn whatever the model returned into a complete [`NormalizedRecord`].
//!
//! Nothing here fails: unparsable output yields the fallback record, and
//! individual bad fields are replaced by scraped values or defaults.

use openai_client::strip_code_blocks;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::language::language_code;
use super::{NormalizedRecord, ScrapedContext, DEFAULT_TAG};
use crate::domains::news::models::NewsCategory;

/// Result of normalization, with a flag telling the reviewer whether the
/// model output was usable at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub record: NormalizedRecord,
    pub used_fallback: bool,
}

pub fn normalize_response(raw: &str, ctx: &ScrapedContext) -> Normalized {
    match parse_object(raw) {
        Some(object) => Normalized {
            record: coerce_record(&object, ctx),
            used_fallback: false,
        },
        None => {
            warn!(
                response_len = raw.len(),
                "AI response was not a JSON object, using fallback record"
            );
            Normalized {
                record: fallback_record(ctx),
                used_fallback: true,
            }
        }
    }
}

/// Schema-complete record built only from scraped fields.
pub fn fallback_record(ctx: &ScrapedContext) -> NormalizedRecord {
    NormalizedRecord {
        title: ctx.title.clone(),
        summary: ctx.description.clone(),
        content: ctx.text.clone(),
        category: NewsCategory::Other,
        tags: default_tags(),
        author: None,
        language: ctx.language.clone(),
    }
}

fn parse_object(raw: &str) -> Option<Map<String, Value>> {
    let stripped = strip_code_blocks(raw);
    if let Ok(Value::Object(object)) = serde_json::from_str(stripped) {
        return Some(object);
    }

    // Prose around a fenced block: take the outermost braces
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str(&raw[start..=end]) {
        Ok(Value::Object(object)) => {
            debug!("Recovered JSON object from surrounding text");
            Some(object)
        }
        _ => None,
    }
}

fn coerce_record(object: &Map<String, Value>, ctx: &ScrapedContext) -> NormalizedRecord {
    NormalizedRecord {
        title: string_field(object, "title").unwrap_or_else(|| ctx.title.clone()),
        summary: string_field(object, "summary").unwrap_or_else(|| ctx.description.clone()),
        content: string_field(object, "content").unwrap_or_else(|| ctx.text.clone()),
        category: string_field(object, "category")
            .map(|c| NewsCategory::coerce(&c))
            .unwrap_or_default(),
        tags: coerce_tags(object.get("tags")),
        author: string_field(object, "author"),
        language: string_field(object, "language")
            .and_then(|l| language_code(&l))
            .map(str::to_string)
            .unwrap_or_else(|| ctx.language.clone()),
    }
}

/// Non-empty trimmed string, or None for missing/null/blank/non-string
fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn coerce_tags(value: Option<&Value>) -> Vec<String> {
    let candidates: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(joined)) => joined.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    let mut tags: Vec<String> = Vec::with_capacity(candidates.len());
    for tag in candidates {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }

    if tags.is_empty() {
        default_tags()
    } else {
        tags
    }
}

fn default_tags() -> Vec<String> {
    vec![DEFAULT_TAG.to_string()]
}
