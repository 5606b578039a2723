//! Core data structures for dictionary lookups
//!
//! A [`DictionaryRecord`] is the raw row read from the dictionary table. The
//! parser and normalizer turn it into a [`WordEntry`], a tree of
//! [`MeaningGroup`]s each holding ordered [`Definition`]s.
//!
//! Field names on the wire follow the public API (`definition_chinese`,
//! `chinese`, ...), so the structures serialize straight into the HTTP
//! responses.

use serde::{Deserialize, Serialize};

/// Part-of-speech tag used when the source text carries no recognizable tag
pub const GENERAL_POS: &str = "general";

/// Placeholder definition emitted when a record has no text at all
pub const NO_DEFINITION: &str = "No definition available";

/// Raw dictionary row, as stored in the ECDICT-style table
///
/// Read-only: nothing in the lookup pipeline mutates a record.
///
/// # Example
///
/// ```ignore
/// DictionaryRecord {
///     word: "hello".to_string(),
///     phonetic: Some("hə'ləʊ".to_string()),
///     part_of_speech_tags: Some("u:97/n:3".to_string()),
///     translation: Some("interj. 喂, 嘿".to_string()),
///     english_definition: Some("n. an expression of greeting".to_string()),
///     detail: None,
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DictionaryRecord {
    pub word: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    /// Tag distribution such as `"u:97/n:3"`
    #[serde(default, alias = "pos")]
    pub part_of_speech_tags: Option<String>,
    /// Target-language gloss text, e.g. `"n. 测试; 考验\nv. 测试"`
    #[serde(default)]
    pub translation: Option<String>,
    /// English definition text, e.g. `"n. an expression of greeting"`
    #[serde(default, alias = "definition")]
    pub english_definition: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl DictionaryRecord {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ..Self::default()
        }
    }

    pub fn with_phonetic(mut self, phonetic: impl Into<String>) -> Self {
        self.phonetic = Some(phonetic.into());
        self
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.english_definition = Some(definition.into());
        self
    }

    /// Join the translation and English definition with a line separator,
    /// skipping whichever side is absent or empty.
    ///
    /// Returns `None` when neither side has text.
    pub fn combined_text(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.translation, &self.english_definition]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }
}

/// One atomic sense: a gloss plus an optional example, each with its
/// translation slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(rename = "definition")]
    pub text: String,
    #[serde(rename = "definition_chinese", default)]
    pub text_translated: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(rename = "example_chinese", default)]
    pub example_translated: Option<String>,
}

impl Definition {
    /// A definition with no translation yet
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            text_translated: None,
            example: None,
            example_translated: None,
        }
    }

    /// A definition whose source text is already in the target language
    pub fn localized(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            text_translated: Some(text.clone()),
            text,
            example: None,
            example_translated: None,
        }
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Drop every translated field, keeping the source text and example
    pub fn untranslated(&self) -> Self {
        Self {
            text: self.text.clone(),
            text_translated: None,
            example: self.example.clone(),
            example_translated: None,
        }
    }
}

/// Senses sharing one part of speech, in order of first appearance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeaningGroup {
    pub part_of_speech: String,
    pub definitions: Vec<Definition>,
}

impl MeaningGroup {
    /// Create a group, substituting [`GENERAL_POS`] for an empty tag
    pub fn new(part_of_speech: impl Into<String>, definitions: Vec<Definition>) -> Self {
        let part_of_speech = part_of_speech.into();
        let part_of_speech = if part_of_speech.trim().is_empty() {
            GENERAL_POS.to_string()
        } else {
            part_of_speech
        };
        Self {
            part_of_speech,
            definitions,
        }
    }

    pub fn general(definitions: Vec<Definition>) -> Self {
        Self::new(GENERAL_POS, definitions)
    }

    /// All translated glosses in order, skipping untranslated ones
    pub fn translated_texts(&self) -> Vec<&str> {
        self.definitions
            .iter()
            .filter_map(|d| d.text_translated.as_deref())
            .collect()
    }

    pub fn untranslated(&self) -> Self {
        Self {
            part_of_speech: self.part_of_speech.clone(),
            definitions: self.definitions.iter().map(Definition::untranslated).collect(),
        }
    }
}

/// Fully assembled, request-scoped lookup result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    /// Always delimited as `/…/` when present
    pub phonetic: Option<String>,
    #[serde(rename = "chinese")]
    pub primary_gloss: Option<String>,
    pub meanings: Vec<MeaningGroup>,
}
