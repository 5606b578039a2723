use std::env;
use std::path::PathBuf;
use std::time::Duration;

use airdict_mt::{DEFAULT_CALL_TIMEOUT, DEFAULT_MAX_CONCURRENCY};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("Unknown translator '{0}' (expected 'google' or 'mock')")]
    UnknownTranslator(String),
}

/// Which translation provider backs the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslatorKind {
    Google,
    Mock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub dict_path: PathBuf,
    pub favorites_path: PathBuf,
    pub translator: TranslatorKind,
    /// Upper bound on provider calls in flight for one request
    pub max_concurrent_translations: usize,
    pub translation_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            dict_path: PathBuf::from("data/dict/stardict.json"),
            favorites_path: PathBuf::from("data/favorites.json"),
            translator: TranslatorKind::Google,
            max_concurrent_translations: DEFAULT_MAX_CONCURRENCY,
            translation_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let translator = match var("AIRDICT_TRANSLATOR") {
            None => defaults.translator,
            Some(name) => match name.trim().to_ascii_lowercase().as_str() {
                "google" => TranslatorKind::Google,
                "mock" => TranslatorKind::Mock,
                _ => return Err(ConfigError::UnknownTranslator(name)),
            },
        };

        let timeout_ms = parse_number(
            &var,
            "AIRDICT_TRANSLATION_TIMEOUT_MS",
            defaults.translation_timeout.as_millis() as u64,
        )?;

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: parse_number(&var, "PORT", defaults.port)?,
            dict_path: var("AIRDICT_DICT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.dict_path),
            favorites_path: var("AIRDICT_FAVORITES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.favorites_path),
            translator,
            max_concurrent_translations: parse_number(
                &var,
                "AIRDICT_MAX_CONCURRENT_TRANSLATIONS",
                defaults.max_concurrent_translations,
            )?,
            translation_timeout: Duration::from_millis(timeout_ms),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<F, T>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match var(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}
