use crate::model::{Definition, DictionaryRecord, MeaningGroup, NO_DEFINITION, WordEntry};
use crate::normalize::{extract_primary_gloss, format_phonetic};
use crate::parser::parse_meanings;

/// Assemble a [`WordEntry`] from a dictionary record.
///
/// The entry always carries at least one meaning group with at least one
/// definition: when nothing parses, a single `"general"` group is built from
/// the raw text, or from [`NO_DEFINITION`] when the record has none.
pub fn build_word_entry(record: &DictionaryRecord) -> WordEntry {
    let mut meanings = record
        .combined_text()
        .map(|text| parse_meanings(&text))
        .unwrap_or_default();

    if meanings.is_empty() {
        meanings.push(fallback_group(record));
    }

    WordEntry {
        word: record.word.clone(),
        phonetic: format_phonetic(record.phonetic.as_deref()),
        primary_gloss: extract_primary_gloss(record.translation.as_deref()),
        meanings,
    }
}

fn non_blank(text: &Option<String>) -> Option<String> {
    text.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn fallback_group(record: &DictionaryRecord) -> MeaningGroup {
    let translation = non_blank(&record.translation);
    let text = non_blank(&record.english_definition)
        .or_else(|| translation.clone())
        .unwrap_or_else(|| NO_DEFINITION.to_string());

    MeaningGroup::general(vec![Definition {
        text,
        text_translated: translation,
        example: None,
        example_translated: None,
    }])
}
