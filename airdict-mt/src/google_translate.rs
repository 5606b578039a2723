//! Google Translate API provider for machine translation
//!
//! This module integrates with Google Translate API v2.
//!
//! # Authentication
//!
//! The provider loads the API key from the `GOOGLE_TRANSLATE_API_KEY`
//! environment variable. `GOOGLE_TRANSLATE_BASE_URL` optionally points it at a
//! proxy or compatible endpoint.
//!
//! # Example
//!
//! ```ignore
//! use airdict_mt::{MachineTranslator, GoogleTranslateProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::from_env()?;
//!     let result = provider.translate("你好", "auto", "en").await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use crate::error::{MtError, MtResult};
use crate::translator::{AUTO_LOCALE, MachineTranslator, provider_locale, validate_locale};
use async_trait::async_trait;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

/// Google Translate API v2 provider
///
/// One request per text: the field translator issues these concurrently so a
/// failing field never takes its siblings down with it.
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    /// API key for authentication
    api_key: String,
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Base URL for Google Translate API
    base_url: String,
}

impl GoogleTranslateProvider {
    /// Maximum characters per string (30KB per Google Translate API limits)
    const MAX_CHARS_PER_STRING: usize = 30_000;

    /// Create a new GoogleTranslateProvider with an explicit API key
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(MtError)` - If API key is empty or HTTP client creation fails
    pub fn new(api_key: String) -> MtResult<Self> {
        if api_key.trim().is_empty() {
            return Err(MtError::ConfigError("API key cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Create a GoogleTranslateProvider from the `GOOGLE_TRANSLATE_API_KEY` environment variable
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(MtError)` - If environment variable is not set or creation fails
    pub fn from_env() -> MtResult<Self> {
        let api_key = std::env::var("GOOGLE_TRANSLATE_API_KEY").map_err(|_| {
            MtError::ConfigError(
                "GOOGLE_TRANSLATE_API_KEY environment variable not set".to_string(),
            )
        })?;

        let provider = Self::new(api_key)?;
        Ok(match std::env::var("GOOGLE_TRANSLATE_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => provider.with_base_url(url),
            _ => provider,
        })
    }

    /// Point the provider at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the JSON request body. An `auto` source is left out so the
    /// API detects the language itself.
    fn request_body(text: &str, source_locale: &str, target_locale: &str) -> serde_json::Value {
        let mut body = json!({
            "q": [text],
            "target": provider_locale(target_locale),
            "format": "text"
        });
        if source_locale != AUTO_LOCALE {
            body["source"] = json!(provider_locale(source_locale));
        }
        body
    }

    /// Reject texts over the per-string limit, counted in characters
    fn check_length(text: &str) -> MtResult<()> {
        if text.chars().count() > Self::MAX_CHARS_PER_STRING {
            return Err(MtError::TranslationError(format!(
                "Text exceeds maximum length of {} characters",
                Self::MAX_CHARS_PER_STRING
            )));
        }
        Ok(())
    }

    /// Pull the first `translatedText` out of an API response
    fn extract_translation(json: &serde_json::Value) -> MtResult<String> {
        let translations = json["data"]["translations"].as_array().ok_or_else(|| {
            MtError::TranslationError(
                "Invalid API response: missing 'data.translations' array".to_string(),
            )
        })?;

        translations
            .first()
            .and_then(|t| t["translatedText"].as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                MtError::TranslationError(
                    "Invalid API response: missing 'translatedText' field".to_string(),
                )
            })
    }
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        Self::check_length(text)?;

        let url = format!("{}?key={}", self.base_url, self.api_key);
        let body = Self::request_body(text, source_locale, target_locale);

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(if status.is_client_error() {
                MtError::ConfigError(format!("API client error ({}): {}", status, error_text))
            } else {
                MtError::TranslationError(format!("API server error ({}): {}", status, error_text))
            });
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            MtError::TranslationError(format!("Failed to parse API response: {}", e))
        })?;

        Self::extract_translation(&json)
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Initialization Tests ==========

    #[test]
    fn test_new_with_valid_key() {
        let provider = GoogleTranslateProvider::new("test-api-key".to_string());
        assert!(provider.is_ok());
        assert_eq!(provider.unwrap().provider_name(), "Google Translate");
    }

    #[test]
    fn test_new_with_empty_key() {
        let result = GoogleTranslateProvider::new("".to_string());
        match result {
            Err(MtError::ConfigError(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected ConfigError"),
        }
    }

    #[test]
    fn test_new_with_whitespace_key() {
        let result = GoogleTranslateProvider::new("   ".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let provider = GoogleTranslateProvider::new("k".to_string())
            .unwrap()
            .with_base_url("http://localhost:9000/translate/");
        assert_eq!(provider.base_url, "http://localhost:9000/translate");
    }

    // ========== Request / Response Tests ==========

    #[test]
    fn test_request_body_with_source() {
        let body = GoogleTranslateProvider::request_body("apple", "en", "zh-CN");
        assert_eq!(body["q"][0], "apple");
        assert_eq!(body["source"], "en");
        assert_eq!(body["target"], "zh-CN");
        assert_eq!(body["format"], "text");
    }

    #[test]
    fn test_request_body_auto_source_omitted() {
        let body = GoogleTranslateProvider::request_body("你好", AUTO_LOCALE, "en");
        assert!(body.get("source").is_none());
        assert_eq!(body["target"], "en");
    }

    #[test]
    fn test_extract_translation() {
        let json = json!({"data": {"translations": [{"translatedText": "苹果"}]}});
        assert_eq!(
            GoogleTranslateProvider::extract_translation(&json).unwrap(),
            "苹果"
        );
    }

    #[test]
    fn test_extract_translation_malformed() {
        let missing_array = json!({"data": {}});
        assert!(matches!(
            GoogleTranslateProvider::extract_translation(&missing_array),
            Err(MtError::TranslationError(_))
        ));

        let empty = json!({"data": {"translations": []}});
        assert!(GoogleTranslateProvider::extract_translation(&empty).is_err());
    }

    // ========== Validation Tests ==========

    #[tokio::test]
    async fn test_translate_blank_text() {
        let provider = GoogleTranslateProvider::new("test-key".to_string()).unwrap();
        assert_eq!(provider.translate("", "en", "zh-CN").await.unwrap(), "");
        assert_eq!(provider.translate("  ", "en", "zh-CN").await.unwrap(), "  ");
    }

    #[tokio::test]
    async fn test_translate_invalid_locale() {
        let provider = GoogleTranslateProvider::new("test-key".to_string()).unwrap();
        assert!(provider.translate("hello", "invalid@code", "fr").await.is_err());
        assert!(provider.translate("hello", "en", "invalid#code").await.is_err());
    }

    #[tokio::test]
    async fn test_translate_text_too_long() {
        let provider = GoogleTranslateProvider::new("test-key".to_string()).unwrap();
        let long_text = "x".repeat(GoogleTranslateProvider::MAX_CHARS_PER_STRING + 1);
        match provider.translate(&long_text, "en", "zh-CN").await {
            Err(MtError::TranslationError(msg)) => assert!(msg.contains("exceeds maximum")),
            _ => panic!("Expected TranslationError"),
        }
    }

    #[test]
    fn test_length_limit_counts_characters() {
        // 30,000 CJK characters are 90,000 bytes but still within the limit
        let cjk = "测".repeat(GoogleTranslateProvider::MAX_CHARS_PER_STRING);
        assert!(GoogleTranslateProvider::check_length(&cjk).is_ok());

        let over = "测".repeat(GoogleTranslateProvider::MAX_CHARS_PER_STRING + 1);
        assert!(GoogleTranslateProvider::check_length(&over).is_err());
    }

    // ========== Debug Implementation Test ==========

    #[test]
    fn test_debug_output() {
        let provider = GoogleTranslateProvider::new("test-key".to_string()).unwrap();
        let debug_str = format!("{:?}", provider);
        assert!(debug_str.contains("***"));
        assert!(!debug_str.contains("test-key"));
    }

    // ========== Integration Tests (require real API key) ==========

    #[tokio::test]
    #[ignore] // Run with: cargo test --ignored
    async fn test_real_api_chinese_to_english() {
        if std::env::var("GOOGLE_TRANSLATE_API_KEY").is_err() {
            eprintln!("Skipping: GOOGLE_TRANSLATE_API_KEY not set");
            return;
        }

        let provider = GoogleTranslateProvider::from_env().unwrap();
        let result = provider.translate("苹果", "zh-CN", "en").await.unwrap();
        println!("Translation: 苹果 → {}", result);
        assert!(result.to_lowercase().contains("apple"));
    }

    #[tokio::test]
    #[ignore] // Run with: cargo test --ignored
    async fn test_real_api_invalid_key() {
        let provider = GoogleTranslateProvider::new("invalid-key-xyz".to_string()).unwrap();
        let result = provider.translate("hello", "en", "zh-CN").await;
        assert!(matches!(
            result,
            Err(MtError::ConfigError(_)) | Err(MtError::TranslationError(_))
        ));
    }
}
