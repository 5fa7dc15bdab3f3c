use crate::domains::news::models::NewsCategory;

use super::ScrapedContext;

pub fn system_prompt() -> String {
    format!(
        r#"당신은 태국에 거주하는 한국인 독자를 위한 뉴스 포털의 편집자입니다.
주어진 자료를 읽고 한국어 기사로 정리하세요.

반드시 아래 키만 가진 JSON 객체 하나로 응답하세요:
{{
  "title": "한국어 제목",
  "summary": "2~3문장 요약",
  "content": "본문 (한국어, 문단은 줄바꿈으로 구분)",
  "category": "카테고리",
  "tags": ["태그1", "태그2"],
  "author": "기자 이름 또는 null",
  "language": "원문 언어 코드 (th, ko, ja, zh, en)"
}}

category 는 다음 중 하나여야 합니다: {categories}
tags 는 3~5개의 짧은 한국어 키워드입니다.
원문에 없는 사실을 추가하지 마세요."#,
        categories = NewsCategory::prompt_list()
    )
}

pub fn article_prompt(ctx: &ScrapedContext) -> String {
    let mut prompt = String::new();
    if let Some(url) = &ctx.source_url {
        prompt.push_str(&format!("출처 URL: {url}\n"));
    }
    if !ctx.title.is_empty() {
        prompt.push_str(&format!("원문 제목: {}\n", ctx.title));
    }
    if !ctx.description.is_empty() {
        prompt.push_str(&format!("원문 설명: {}\n", ctx.description));
    }
    prompt.push_str(&format!("감지된 언어: {}\n\n", ctx.language));
    prompt.push_str("원문:\n");
    prompt.push_str(&ctx.text);
    prompt
}

pub fn image_prompt(hint_title: Option<&str>) -> String {
    let mut prompt = String::from(
        "첨부된 이미지(기사 캡처, 공지문, 포스터 등)의 글자를 읽고 내용을 기사로 정리하세요.",
    );
    if let Some(title) = hint_title.filter(|t| !t.trim().is_empty()) {
        prompt.push_str(&format!("\n참고 제목: {title}"));
    }
    prompt
}
