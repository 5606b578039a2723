//! Lookup orchestration
//!
//! [`Lookup`] composes language detection, the dictionary store, the
//! record parser and the [`FieldTranslator`] into the two query flows:
//!
//! - **search**: English words are answered from the dictionary alone;
//!   anything else is machine translated into candidate English terms.
//! - **define**: the full entry for an English word, with every meaning
//!   group translated field by field.
//!
//! Translation is best effort on both flows. Only a missing word (or an
//! empty query) is reported as an error.

use std::collections::BTreeSet;
use std::sync::Arc;

use airdict::{DictionaryStore, Language, MeaningGroup, WordEntry, build_word_entry, detect};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::fanout::FieldTranslator;

/// Language the dictionary glosses are translated into
pub const GLOSS_LOCALE: &str = "zh-CN";

/// Language non-English queries are translated into
pub const QUERY_TARGET_LOCALE: &str = "en";

/// Outcomes of a lookup that are not a result
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Word not found: {0}")]
    NotFound(String),

    #[error("Query cannot be empty")]
    EmptyQuery,
}

/// Part of speech with its senses joined into one line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleMeaning {
    pub pos: String,
    pub meaning: String,
}

impl SimpleMeaning {
    /// Join a group's translated senses with `"; "`. Groups with nothing
    /// translated yield `None`.
    pub fn from_group(group: &MeaningGroup) -> Option<Self> {
        let texts = group.translated_texts();
        if texts.is_empty() {
            return None;
        }
        Some(Self {
            pos: group.part_of_speech.clone(),
            meaning: texts.join("; "),
        })
    }
}

/// Dictionary answer for an English query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnglishResult {
    pub word: String,
    pub phonetic: Option<String>,
    pub meanings: Vec<SimpleMeaning>,
}

/// Candidate English terms for a non-English query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChineseResult {
    pub translations: BTreeSet<String>,
}

/// Result of the simplified search flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    English(EnglishResult),
    Translated {
        detected: Language,
        result: ChineseResult,
    },
}

/// Wire shape of a search answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub is_chinese: bool,
    pub english_result: Option<EnglishResult>,
    pub chinese_result: Option<ChineseResult>,
}

impl SearchResponse {
    pub fn new(query: impl Into<String>, outcome: SearchOutcome) -> Self {
        let query = query.into();
        match outcome {
            SearchOutcome::English(result) => Self {
                query,
                is_chinese: false,
                english_result: Some(result),
                chinese_result: None,
            },
            SearchOutcome::Translated { result, .. } => Self {
                query,
                is_chinese: true,
                english_result: None,
                chinese_result: Some(result),
            },
        }
    }
}

/// Split a translated phrase into distinct candidate terms
///
/// Separators are `,`, `，` and `、`; blanks are dropped.
pub fn split_candidates(text: &str) -> BTreeSet<String> {
    text.split([',', '，', '、'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lookup orchestrator over an injected dictionary and translator
#[derive(Clone)]
pub struct Lookup {
    store: Arc<dyn DictionaryStore>,
    translator: FieldTranslator,
}

impl Lookup {
    pub fn new(store: Arc<dyn DictionaryStore>, translator: FieldTranslator) -> Self {
        Self { store, translator }
    }

    pub fn translator(&self) -> &FieldTranslator {
        &self.translator
    }

    /// Build the untranslated entry for a word
    pub fn find_entry(&self, word: &str) -> Result<WordEntry, LookupError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        match self.store.lookup_exact(&word.to_lowercase()) {
            Some(record) => {
                debug!("Found '{}' in dictionary", record.word);
                Ok(build_word_entry(&record))
            }
            None => {
                info!("'{}' not found in dictionary", word);
                Err(LookupError::NotFound(word.to_string()))
            }
        }
    }

    /// Simplified search
    ///
    /// Non-English queries are translated to English and split into
    /// candidates without touching the dictionary. English queries are
    /// answered from the dictionary's own glosses with no provider call.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        let detected = detect(query);
        info!("Search '{}' detected as {:?}", query, detected);

        if !detected.is_english() {
            let translated = self
                .translator
                .translate_one(query, detected.code(), QUERY_TARGET_LOCALE)
                .await;
            debug!("{} → {}: {}", detected.code(), QUERY_TARGET_LOCALE, translated);
            return Ok(SearchOutcome::Translated {
                detected,
                result: ChineseResult {
                    translations: split_candidates(&translated),
                },
            });
        }

        let entry = self.find_entry(query)?;
        Ok(SearchOutcome::English(EnglishResult {
            meanings: entry
                .meanings
                .iter()
                .filter_map(SimpleMeaning::from_group)
                .collect(),
            word: entry.word,
            phonetic: entry.phonetic,
        }))
    }

    /// Full definition with every meaning group translated
    ///
    /// The dictionary's primary gloss is kept; when the record has none the
    /// word itself is translated.
    pub async fn define(&self, word: &str) -> Result<WordEntry, LookupError> {
        let mut entry = self.find_entry(word)?;

        self.translator
            .enrich_entry(&mut entry, QUERY_TARGET_LOCALE, GLOSS_LOCALE)
            .await;

        if entry.primary_gloss.is_none() {
            let gloss = self
                .translator
                .translate_one(&entry.word, QUERY_TARGET_LOCALE, GLOSS_LOCALE)
                .await;
            if gloss != entry.word {
                entry.primary_gloss = Some(gloss);
            }
        }

        info!(
            "Defined '{}' with {} meaning groups",
            entry.word,
            entry.meanings.len()
        );
        Ok(entry)
    }

    /// Dictionary gloss of a word, when the word is known and has one
    pub fn primary_gloss(&self, word: &str) -> Option<String> {
        self.find_entry(word).ok().and_then(|entry| entry.primary_gloss)
    }

    /// Up to `limit` dictionary words starting with `prefix`, for autocomplete
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<String> {
        let prefix = prefix.trim();
        if prefix.is_empty() || limit == 0 {
            return Vec::new();
        }
        self.store.lookup_prefix(prefix, limit)
    }
}

impl std::fmt::Debug for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lookup")
            .field("entries", &self.store.len())
            .field("translator", &self.translator)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airdict::{Definition, MemoryDictionary};
    use crate::mock::{MockMode, MockTranslator};

    fn lookup_with(mock: MockTranslator) -> Lookup {
        let dictionary: MemoryDictionary = [airdict::DictionaryRecord::new("test")
            .with_translation("n. 测试; 考验\nv. 测试; 检验")]
        .into_iter()
        .collect();
        Lookup::new(Arc::new(dictionary), FieldTranslator::new(Arc::new(mock)))
    }

    #[test]
    fn test_split_candidates() {
        let expected: BTreeSet<String> = ["hello", "world"].iter().map(|s| s.to_string()).collect();
        assert_eq!(split_candidates("hello, world"), expected);
        assert_eq!(split_candidates("hello，world"), expected);
        assert_eq!(split_candidates("hello、world, ,hello"), expected);
        assert!(split_candidates(" , ").is_empty());
    }

    #[test]
    fn test_simple_meaning_joins_translations() {
        let group = MeaningGroup::new(
            "noun",
            vec![Definition::localized("测试"), Definition::localized("考验")],
        );
        assert_eq!(
            SimpleMeaning::from_group(&group),
            Some(SimpleMeaning {
                pos: "noun".to_string(),
                meaning: "测试; 考验".to_string()
            })
        );

        let untranslated = MeaningGroup::new("noun", vec![Definition::new("test")]);
        assert_eq!(SimpleMeaning::from_group(&untranslated), None);
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let lookup = lookup_with(MockTranslator::new(MockMode::Suffix));
        assert_eq!(lookup.search("   ").await, Err(LookupError::EmptyQuery));
    }

    #[tokio::test]
    async fn test_search_english_makes_no_provider_call() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let lookup = lookup_with(mock.clone());
        let outcome = lookup.search(" Test ").await.unwrap();
        match outcome {
            SearchOutcome::English(result) => {
                assert_eq!(result.word, "test");
                assert_eq!(result.meanings.len(), 2);
                assert_eq!(result.meanings[0].meaning, "测试; 考验");
                assert_eq!(result.meanings[1].pos, "verb");
            }
            other => panic!("Expected English outcome, got {:?}", other),
        }
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_search_japanese_is_translated() {
        let mock = MockTranslator::with_mappings([("こんにちは", "en", "hello, good afternoon")]);
        let lookup = lookup_with(mock);
        match lookup.search("こんにちは").await.unwrap() {
            SearchOutcome::Translated { detected, result } => {
                assert_eq!(detected, Language::Japanese);
                assert_eq!(result.translations.len(), 2);
                assert!(result.translations.contains("good afternoon"));
            }
            other => panic!("Expected translated outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_response_shape() {
        let lookup = lookup_with(MockTranslator::with_mappings([("苹果", "en", "apple")]));
        let outcome = lookup.search("苹果").await.unwrap();
        let json = serde_json::to_value(SearchResponse::new("苹果", outcome)).unwrap();
        assert_eq!(json["query"], "苹果");
        assert_eq!(json["is_chinese"], true);
        assert!(json["english_result"].is_null());
        assert_eq!(json["chinese_result"]["translations"][0], "apple");
    }

    #[tokio::test]
    async fn test_define_missing_word() {
        let lookup = lookup_with(MockTranslator::new(MockMode::Suffix));
        assert_eq!(
            lookup.define("nope").await,
            Err(LookupError::NotFound("nope".to_string()))
        );
    }

    #[tokio::test]
    async fn test_define_keeps_dictionary_gloss() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let lookup = lookup_with(mock.clone());
        let entry = lookup.define("test").await.unwrap();
        assert_eq!(entry.primary_gloss.as_deref(), Some("测试; 考验"));
        // Four definitions, no examples, no gloss translation
        assert_eq!(mock.call_count(), 4);
        assert_eq!(
            entry.meanings[0].definitions[0].text_translated.as_deref(),
            Some("测试_zh-CN")
        );
    }

    #[tokio::test]
    async fn test_define_translates_missing_gloss() {
        let dictionary: MemoryDictionary = [airdict::DictionaryRecord::new("greet")
            .with_definition("v. to say hello")]
        .into_iter()
        .collect();
        let mock = MockTranslator::with_mappings([("greet", "zh-CN", "问候")]);
        let lookup = Lookup::new(Arc::new(dictionary), FieldTranslator::new(Arc::new(mock)));
        let entry = lookup.define("greet").await.unwrap();
        assert_eq!(entry.primary_gloss.as_deref(), Some("问候"));
    }

    #[tokio::test]
    async fn test_define_gloss_failure_leaves_none() {
        let dictionary: MemoryDictionary = [airdict::DictionaryRecord::new("greet")
            .with_definition("v. to say hello")]
        .into_iter()
        .collect();
        let mock = MockTranslator::new(MockMode::Error("down".to_string()));
        let lookup = Lookup::new(Arc::new(dictionary), FieldTranslator::new(Arc::new(mock)));
        let entry = lookup.define("greet").await.unwrap();
        assert_eq!(entry.primary_gloss, None);
        assert_eq!(
            entry.meanings[0].definitions[0].text_translated.as_deref(),
            Some("to say hello")
        );
    }

    #[test]
    fn test_primary_gloss() {
        let lookup = lookup_with(MockTranslator::new(MockMode::Suffix));
        assert_eq!(lookup.primary_gloss("Test").as_deref(), Some("测试; 考验"));
        assert_eq!(lookup.primary_gloss("missing"), None);
        assert_eq!(lookup.primary_gloss(""), None);
    }

    #[test]
    fn test_suggest() {
        let lookup = lookup_with(MockTranslator::new(MockMode::Suffix));
        assert_eq!(lookup.suggest("TE", 5), vec!["test"]);
        assert!(lookup.suggest("", 5).is_empty());
        assert!(lookup.suggest("te", 0).is_empty());
    }
}
