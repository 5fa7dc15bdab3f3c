//! Script-based language guess.
//!
//! Not a classifier: the first script found in priority order wins, so any
//! Thai character makes the text "th" even if it is mostly Korean.

/// ISO 639-1 code used when no listed script appears
pub const DEFAULT_LANGUAGE: &str = "en";

pub fn detect_language(text: &str) -> &'static str {
    if text.chars().any(is_thai) {
        "th"
    } else if text.chars().any(is_hangul) {
        "ko"
    } else if text.chars().any(is_kana) {
        "ja"
    } else if text.chars().any(is_cjk_ideograph) {
        "zh"
    } else {
        DEFAULT_LANGUAGE
    }
}

/// Map a model-reported language onto the supported codes. Accepts the
/// codes themselves, common locale forms ("ko-KR") and English or native
/// names. Anything else is `None`.
pub fn language_code(reported: &str) -> Option<&'static str> {
    let reported = reported.trim().to_lowercase();
    let primary = reported
        .split(['-', '_'])
        .next()
        .unwrap_or_default();

    match primary {
        "th" | "thai" | "ไทย" | "태국어" => Some("th"),
        "ko" | "korean" | "한국어" => Some("ko"),
        "ja" | "japanese" | "日本語" | "일본어" => Some("ja"),
        "zh" | "chinese" | "中文" | "중국어" => Some("zh"),
        "en" | "english" | "영어" => Some("en"),
        _ => None,
    }
}

fn is_thai(c: char) -> bool {
    matches!(c, '\u{0E00}'..='\u{0E7F}')
}

fn is_hangul(c: char) -> bool {
    matches!(c,
        '\u{1100}'..='\u{11FF}'     // Jamo
        | '\u{3130}'..='\u{318F}'   // Compatibility Jamo
        | '\u{AC00}'..='\u{D7AF}'   // Syllables
    )
}

fn is_kana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{30FF}')
}

fn is_cjk_ideograph(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}')
}
