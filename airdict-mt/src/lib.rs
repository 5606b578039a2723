//! Machine translation and lookup orchestration for Air Dict
//!
//! This crate adds the network-facing half of the dictionary on top of the
//! `airdict` core:
//!
//! 1. **MT trait & providers** - [`MachineTranslator`] with Google Translate
//!    and mock implementations
//! 2. **Field translator** - concurrent, order-preserving translation of every
//!    text field of a meaning group, with per-field fallback
//! 3. **Lookup** - the search, definition and suggestion flows
//! 4. **Explanations** - [`WordExplainer`] backed by an OpenAI-compatible
//!    chat model
//!
//! # Workflow Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use airdict::load_dictionary_from_file;
//! use airdict_mt::{FieldTranslator, GoogleTranslateProvider, Lookup};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dictionary = load_dictionary_from_file("data/dict/stardict.json".as_ref())?;
//!     let provider = GoogleTranslateProvider::from_env()?;
//!     let lookup = Lookup::new(
//!         Arc::new(dictionary),
//!         FieldTranslator::new(Arc::new(provider)),
//!     );
//!
//!     let entry = lookup.define("hello").await?;
//!     println!("{}", serde_json::to_string_pretty(&entry)?);
//!     Ok(())
//! }
//! ```

pub mod data;
pub mod error;
pub mod fanout;
pub mod google_translate;
pub mod llm;
pub mod lookup;
pub mod mock;
pub mod translator;


// Re-export main types for convenient access
pub use data::{FieldSlot, TranslationTask, flatten_group, scatter_group};
pub use error::{MtError, MtResult};
pub use fanout::{DEFAULT_CALL_TIMEOUT, DEFAULT_MAX_CONCURRENCY, FieldTranslator};
pub use google_translate::GoogleTranslateProvider;
pub use llm::{
    DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL, LlmExample, LlmExplanation, OpenAiExplainer,
    WordExplainer,
};
pub use lookup::{
    ChineseResult, EnglishResult, GLOSS_LOCALE, Lookup, LookupError, QUERY_TARGET_LOCALE,
    SearchOutcome, SearchResponse, SimpleMeaning, split_candidates,
};
pub use mock::{MockMode, MockTranslator};
pub use translator::{AUTO_LOCALE, MachineTranslator};
