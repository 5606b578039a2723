use serde::{Deserialize, Serialize};

/// Language of a free-text query, used to choose the lookup path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Chinese,
    Japanese,
    Korean,
    English,
}

impl Language {
    /// Provider language tag
    pub fn code(&self) -> &'static str {
        match self {
            Language::Chinese => "zh-CN",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::English => "en",
        }
    }

    pub fn is_english(&self) -> bool {
        matches!(self, Language::English)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

fn is_kana(c: char) -> bool {
    ('\u{3040}'..='\u{30FF}').contains(&c)
}

fn is_hangul(c: char) -> bool {
    ('\u{AC00}'..='\u{D7AF}').contains(&c)
}

/// Classify a query by script.
///
/// Checked in fixed priority: any CJK ideograph makes the query Chinese, then
/// kana, then hangul. Everything else is English, so every input classifies.
pub fn detect(text: &str) -> Language {
    if text.chars().any(is_cjk_ideograph) {
        Language::Chinese
    } else if text.chars().any(is_kana) {
        Language::Japanese
    } else if text.chars().any(is_hangul) {
        Language::Korean
    } else {
        Language::English
    }
}
