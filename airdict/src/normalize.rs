//! Phonetic and gloss normalization
//!
//! Two independent helpers used when assembling a [`crate::WordEntry`]:
//!
//! - [`format_phonetic`] wraps a bare transcription in `/…/`
//! - [`extract_primary_gloss`] pulls the first translation line out of a
//!   tagged translation text

use std::sync::LazyLock;

use regex::Regex;

static POS_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z]+\.\s*").expect("pos prefix pattern"));

/// Wrap a phonetic transcription in `/…/` delimiters
///
/// Input that already starts with `/` is returned unchanged. No IPA
/// validation is done.
///
/// # Example
///
/// ```ignore
/// assert_eq!(format_phonetic(Some("hə'ləʊ")), Some("/hə'ləʊ/".to_string()));
/// assert_eq!(format_phonetic(Some("/test/")), Some("/test/".to_string()));
/// ```
pub fn format_phonetic(raw: Option<&str>) -> Option<String> {
    let raw = raw.filter(|s| !s.is_empty())?;
    if raw.starts_with('/') {
        Some(raw.to_string())
    } else {
        Some(format!("/{}/", raw))
    }
}

/// Extract the translation-only text of the first listed gloss
///
/// Strips a single leading part-of-speech prefix such as `interj. ` and keeps
/// only the first line.
///
/// # Example
///
/// ```ignore
/// assert_eq!(extract_primary_gloss(Some("interj. 喂, 嘿")), Some("喂, 嘿".to_string()));
/// ```
pub fn extract_primary_gloss(raw: Option<&str>) -> Option<String> {
    let raw = raw.filter(|s| !s.is_empty())?;
    let stripped = POS_PREFIX.replace(raw, "");
    let first_line = stripped.split('\n').next().unwrap_or_default().trim();
    if first_line.is_empty() {
        None
    } else {
        Some(first_line.to_string())
    }
}
