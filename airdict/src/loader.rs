use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::dictionary::{DictionaryStore, MemoryDictionary};
use crate::model::DictionaryRecord;

/// Errors raised while loading a dictionary file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Dictionary file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dictionary JSON in '{path}': {source}")]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse dictionary records from a JSON string
///
/// The JSON must be an array of records:
/// ```json
/// [
///     {"word": "hello", "phonetic": "hə'ləʊ", "translation": "interj. 喂, 嘿",
///      "definition": "n. an expression of greeting"},
///     {"word": "test", "translation": "n. 测试; 考验\nv. 测试; 检验"}
/// ]
/// ```
pub fn parse_records(json: &str) -> Result<Vec<DictionaryRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Load a dictionary from a single JSON file
///
/// # Errors
/// - File not found
/// - File read errors
/// - Invalid JSON
pub fn load_dictionary_from_file(path: &Path) -> Result<MemoryDictionary, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_records(&content).map_err(|source| LoadError::InvalidFormat {
        path: path.to_path_buf(),
        source,
    })?;

    let record_count = records.len();
    let dictionary: MemoryDictionary = records.into_iter().collect();

    if dictionary.len() < record_count {
        warn!(
            "Skipped {} duplicate or blank records in {}",
            record_count - dictionary.len(),
            path.display()
        );
    }
    info!(
        "Loaded {} dictionary entries from {}",
        dictionary.len(),
        path.display()
    );

    Ok(dictionary)
}
