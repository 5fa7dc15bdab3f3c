//! HTML to plain text, plus the three metadata fields we care about.
//! Malformed markup never fails, it just yields less.

use scraper::{Html, Selector};

/// Elements whose text never reaches the model.
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// What we keep from a fetched page. Missing pieces are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedPage {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub text: String,
}

pub fn extract_page(html: &str) -> ScrapedPage {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|el| collapse_whitespace(el.text()))
        })
        .unwrap_or_default();

    let description = meta_content(&document, r#"meta[name="description"]"#).unwrap_or_default();

    let image_url = meta_content(&document, r#"meta[property="og:image"]"#)
        .or_else(|| meta_content(&document, r#"meta[name="og:image"]"#))
        .unwrap_or_default();

    ScrapedPage {
        title,
        description,
        image_url,
        text: visible_text(&document),
    }
}

/// Body text with script/style content dropped and whitespace collapsed.
pub fn html_to_text(html: &str) -> String {
    visible_text(&Html::parse_document(html))
}

fn visible_text(document: &Html) -> String {
    let pieces = document.root_element().descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        (!hidden).then_some(&**text)
    });
    collapse_whitespace(pieces)
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(|content| collapse_whitespace(std::iter::once(content)))
        .find(|content| !content.is_empty())
}

fn collapse_whitespace<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    pieces
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
