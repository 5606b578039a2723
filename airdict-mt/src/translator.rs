//! Machine Translation trait and utilities
//!
//! This module defines the `MachineTranslator` trait for provider abstraction,
//! so the lookup pipeline works against Google Translate, the mock, or any
//! other backend without coupling to one implementation.
//!
//! # Example
//!
//! ```ignore
//! use airdict_mt::{MachineTranslator, GoogleTranslateProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::from_env()?;
//!     let result = provider.translate("apple", "en", "zh-CN").await?;
//!     println!("{}", result); // "苹果"
//!     Ok(())
//! }
//! ```

use crate::error::{MtError, MtResult};
use async_trait::async_trait;

/// Source tag asking the provider to detect the language itself
pub const AUTO_LOCALE: &str = "auto";

/// Generic trait for machine translation providers
///
/// Implementations handle the actual translation work, whether through an
/// API (Google Translate) or deterministic logic (Mock). Callers that need
/// many fields translated go through [`crate::FieldTranslator`], which adds
/// concurrency and per-field fallback on top of this trait.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text string from source to target locale
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate
    /// * `source_locale` - Source language code (e.g., "en", "zh-CN", or "auto")
    /// * `target_locale` - Target language code (e.g., "zh-CN")
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text
    /// * `Err(MtError)` - On transport, quota or response failure
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String>;

    /// Get the name of this translation provider, for logging
    fn provider_name(&self) -> &str;
}

/// Map a locale tag to the code the provider expects
///
/// Chinese keeps its script region (`zh-CN`, `zh-TW`) since the provider
/// distinguishes them; other tags are reduced to their base language:
/// - `en-US` → `en`
/// - `zh-cn` → `zh-CN`
/// - `ja` → `ja`
pub fn provider_locale(locale: &str) -> String {
    let mut parts = locale.split(['-', '_']);
    let base = parts.next().unwrap_or(locale).to_lowercase();
    match (base.as_str(), parts.next()) {
        ("zh", Some(region)) => format!("zh-{}", region.to_uppercase()),
        _ => base,
    }
}

/// Validate that a locale code is in acceptable format
///
/// Checks that the locale code contains only alphanumeric characters,
/// hyphens, and underscores.
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.is_empty() {
        return Err(MtError::InvalidLocale("Locale code is empty".to_string()));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MtError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}
