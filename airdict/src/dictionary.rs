use std::collections::BTreeMap;

use crate::model::DictionaryRecord;

/// Read-only keyed dictionary table
///
/// Implementations must treat keys case-insensitively. A missing word is a
/// normal outcome, reported as `None`.
pub trait DictionaryStore: Send + Sync {
    /// Look up a word by case-insensitive exact match
    fn lookup_exact(&self, word: &str) -> Option<DictionaryRecord>;

    /// Return up to `limit` words starting with `prefix`, in lexicographic order
    fn lookup_prefix(&self, prefix: &str, limit: usize) -> Vec<String>;

    /// Number of entries, used for startup logging
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory dictionary keyed on the lower-cased headword
///
/// Prefix scans walk the ordered key range, so results come out sorted.
#[derive(Debug, Default, Clone)]
pub struct MemoryDictionary {
    entries: BTreeMap<String, DictionaryRecord>,
}

impl MemoryDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. The first record seen for a key wins.
    pub fn insert(&mut self, record: DictionaryRecord) -> &mut Self {
        let key = record.word.trim().to_lowercase();
        if !key.is_empty() {
            self.entries.entry(key).or_insert(record);
        }
        self
    }
}

impl FromIterator<DictionaryRecord> for MemoryDictionary {
    fn from_iter<I: IntoIterator<Item = DictionaryRecord>>(iter: I) -> Self {
        let mut dictionary = MemoryDictionary::new();
        for record in iter {
            dictionary.insert(record);
        }
        dictionary
    }
}

impl DictionaryStore for MemoryDictionary {
    fn lookup_exact(&self, word: &str) -> Option<DictionaryRecord> {
        self.entries.get(&word.trim().to_lowercase()).cloned()
    }

    fn lookup_prefix(&self, prefix: &str, limit: usize) -> Vec<String> {
        let prefix = prefix.trim().to_lowercase();
        self.entries
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .take(limit)
            .map(|(_, record)| record.word.clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
