//! Favorites persisted as a JSON document `{"favorites": [...]}`
//!
//! Newest favorites come first. Words are de-duplicated case-insensitively.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    #[error("Failed to access favorites file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Favorites file {path} is not valid: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode favorites: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Request body for adding a favorite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFavorite {
    pub word: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub chinese: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: String,
    pub word: String,
    pub phonetic: Option<String>,
    pub chinese: Option<String>,
    /// Written as RFC 3339; timestamps without an offset are read as UTC
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(timestamp) => Ok(timestamp.with_timezone(&Utc)),
        Err(_) => raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()),
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FavoritesFile {
    #[serde(default)]
    favorites: Vec<Favorite>,
}

/// File-backed favorites list
///
/// Every operation reads the file under the lock, so concurrent requests
/// never interleave a read-modify-write.
#[derive(Debug)]
pub struct FavoritesStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn list(&self) -> Result<Vec<Favorite>, FavoritesError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Add a word, or return the existing favorite for it
    pub async fn add(&self, new: NewFavorite) -> Result<Favorite, FavoritesError> {
        let _guard = self.lock.lock().await;
        let mut favorites = self.load().await?;

        let word = new.word.trim();
        if let Some(existing) = find_word(&favorites, word) {
            return Ok(existing.clone());
        }

        let favorite = Favorite {
            id: Uuid::new_v4().to_string(),
            word: word.to_string(),
            phonetic: new.phonetic,
            chinese: new.chinese,
            created_at: Utc::now(),
        };
        favorites.insert(0, favorite.clone());
        self.save(favorites).await?;

        info!("Added '{}' to favorites", favorite.word);
        Ok(favorite)
    }

    /// Remove by id. Returns whether anything was removed.
    pub async fn remove(&self, id: &str) -> Result<bool, FavoritesError> {
        let _guard = self.lock.lock().await;
        let mut favorites = self.load().await?;

        let before = favorites.len();
        favorites.retain(|f| f.id != id);
        if favorites.len() == before {
            return Ok(false);
        }

        self.save(favorites).await?;
        info!("Removed favorite {}", id);
        Ok(true)
    }

    pub async fn check(&self, word: &str) -> Result<Option<Favorite>, FavoritesError> {
        let _guard = self.lock.lock().await;
        let favorites = self.load().await?;
        Ok(find_word(&favorites, word).cloned())
    }

    async fn load(&self) -> Result<Vec<Favorite>, FavoritesError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(FavoritesError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        // An unreadable file is reported, never overwritten
        serde_json::from_str::<FavoritesFile>(&contents)
            .map(|file| file.favorites)
            .map_err(|source| FavoritesError::Decode {
                path: self.path.clone(),
                source,
            })
    }

    async fn save(&self, favorites: Vec<Favorite>) -> Result<(), FavoritesError> {
        let json = serde_json::to_string_pretty(&FavoritesFile { favorites })?;
        let io_err = |source: io::Error| FavoritesError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&self.path, json).await.map_err(io_err)
    }
}

fn find_word<'a>(favorites: &'a [Favorite], word: &str) -> Option<&'a Favorite> {
    let word = word.trim().to_lowercase();
    favorites
        .iter()
        .find(|f| f.word.trim().to_lowercase() == word)
}
