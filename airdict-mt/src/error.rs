/// Error types for the translation module
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MtError {
    /// Provider is misconfigured (missing key, rejected credentials)
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Transport failure talking to the provider
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Provider answered but the translation failed or was malformed
    #[error("Translation error: {0}")]
    TranslationError(String),
    /// Provider call exceeded its time budget
    #[error("Translation timed out after {0}ms")]
    Timeout(u64),
    /// Language tag rejected before any request is made
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
    /// Provider answered with a body that could not be understood
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
    /// Translated results could not be mapped back onto their fields
    #[error("Reassembly error: {0}")]
    ReassemblyError(String),
}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MtError::NetworkError(format!("request timed out: {}", err))
        } else {
            MtError::NetworkError(err.to_string())
        }
    }
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;
