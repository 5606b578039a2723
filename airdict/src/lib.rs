//! Core of the Air Dict bilingual dictionary
//!
//! This crate turns raw dictionary rows into structured, part-of-speech
//! grouped word entries:
//!
//! 1. **Model** - [`DictionaryRecord`] in, [`WordEntry`] out
//! 2. **Parser** - splits combined gloss text into [`MeaningGroup`]s
//! 3. **Normalizer** - phonetic delimiters and the primary gloss
//! 4. **Language detection** - picks the lookup path for a query
//! 5. **Dictionary store** - read-only keyed table with prefix scans
//!
//! # Example
//!
//! ```ignore
//! use airdict::{DictionaryRecord, DictionaryStore, MemoryDictionary, build_word_entry};
//!
//! let dictionary: MemoryDictionary = [DictionaryRecord::new("hello")
//!     .with_phonetic("hə'ləʊ")
//!     .with_translation("interj. 喂, 嘿")]
//! .into_iter()
//! .collect();
//!
//! let record = dictionary.lookup_exact("Hello").unwrap();
//! let entry = build_word_entry(&record);
//! assert_eq!(entry.phonetic.as_deref(), Some("/hə'ləʊ/"));
//! ```

pub mod dictionary;
pub mod entry;
pub mod language;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod parser;

pub use dictionary::{DictionaryStore, MemoryDictionary};
pub use entry::build_word_entry;
pub use language::{Language, detect};
pub use loader::{LoadError, load_dictionary_from_file, parse_records};
pub use model::{
    Definition, DictionaryRecord, GENERAL_POS, MeaningGroup, NO_DEFINITION, WordEntry,
};
pub use normalize::{extract_primary_gloss, format_phonetic};
pub use parser::{Parser, normalize_pos, parse_meanings, split_senses};
