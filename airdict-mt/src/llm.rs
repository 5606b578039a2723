//! Word explanations from an OpenAI-compatible chat model
//!
//! [`OpenAiExplainer`] asks a chat-completions endpoint for a structured JSON
//! explanation of an English word and maps it onto [`LlmExplanation`].
//! Missing or mistyped fields in the model's answer fall back to empty
//! values; an answer without examples gets one placeholder example.
//!
//! # Configuration
//!
//! - `OPENAI_API_KEY`: required
//! - `OPENAI_BASE_URL`: optional, defaults to the public OpenAI API
//! - `OPENAI_MODEL`: optional, defaults to `gpt-4o-mini`
//!
//! # Example
//!
//! ```ignore
//! use airdict_mt::{OpenAiExplainer, WordExplainer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let explainer = OpenAiExplainer::from_env()?;
//!     let explanation = explainer.explain("serendipity", Some("意外发现")).await?;
//!     println!("{}", explanation.detailed_explanation);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{MtError, MtResult};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You are an English teacher writing dictionary notes for Chinese \
     learners. Write every explanation and translation in Simplified Chinese. Answer with a \
     single JSON object.";

/// Example sentence with its translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmExample {
    pub sentence: String,
    pub translation: String,
}

/// Model-generated explanation of a word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmExplanation {
    pub word: String,
    pub pronunciation: Option<String>,
    pub basic_translation: String,
    pub detailed_explanation: String,
    pub etymology: Option<String>,
    pub memory_tips: Option<String>,
    pub usage_notes: Option<String>,
    pub common_collocations: Option<Vec<String>>,
    pub examples: Vec<LlmExample>,
    pub synonyms: Option<Vec<String>>,
    pub antonyms: Option<Vec<String>>,
    pub related_words: Option<Vec<String>>,
    /// `beginner`, `intermediate` or `advanced`
    pub difficulty_level: Option<String>,
    /// `common`, `uncommon` or `rare`
    pub frequency: Option<String>,
}

impl LlmExplanation {
    /// Map the model's JSON object onto an explanation, tolerating gaps
    pub fn from_model_json(word: &str, data: &Value) -> Self {
        let mut examples: Vec<LlmExample> = data["examples"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.is_object())
                    .map(|item| LlmExample {
                        sentence: text_or_empty(&item["sentence"]),
                        translation: text_or_empty(&item["translation"]),
                    })
                    .collect()
            })
            .unwrap_or_default();

        if examples.is_empty() {
            examples.push(LlmExample {
                sentence: format!("Example with {}.", word),
                translation: format!("使用 {} 的例句。", word),
            });
        }

        Self {
            word: word.to_string(),
            pronunciation: optional_text(&data["pronunciation"]),
            basic_translation: text_or_empty(&data["basic_translation"]),
            detailed_explanation: text_or_empty(&data["detailed_explanation"]),
            etymology: optional_text(&data["etymology"]),
            memory_tips: optional_text(&data["memory_tips"]),
            usage_notes: optional_text(&data["usage_notes"]),
            common_collocations: string_list(&data["common_collocations"]),
            examples,
            synonyms: string_list(&data["synonyms"]),
            antonyms: string_list(&data["antonyms"]),
            related_words: string_list(&data["related_words"]),
            difficulty_level: optional_text(&data["difficulty_level"]),
            frequency: optional_text(&data["frequency"]),
        }
    }
}

fn optional_text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn text_or_empty(value: &Value) -> String {
    optional_text(value).unwrap_or_default()
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(optional_text).collect())
}

/// Source of detailed word explanations
#[async_trait]
pub trait WordExplainer: Send + Sync {
    /// Explain `word`, optionally anchored on a known short gloss
    async fn explain(
        &self,
        word: &str,
        basic_definition: Option<&str>,
    ) -> MtResult<LlmExplanation>;

    fn provider_name(&self) -> &str;
}

/// Chat-completions client for OpenAI-compatible APIs
#[derive(Clone)]
pub struct OpenAiExplainer {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenAiExplainer {
    pub fn new(api_key: String) -> MtResult<Self> {
        if api_key.trim().is_empty() {
            return Err(MtError::ConfigError("API key cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
        })
    }

    /// Build from `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_MODEL`
    pub fn from_env() -> MtResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            MtError::ConfigError("OPENAI_API_KEY environment variable not set".to_string())
        })?;

        let explainer = Self::new(api_key)?;
        let explainer = match std::env::var("OPENAI_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => explainer.with_base_url(url),
            _ => explainer,
        };
        Ok(match std::env::var("OPENAI_MODEL") {
            Ok(model) if !model.trim().is_empty() => explainer.with_model(model),
            _ => explainer,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn user_prompt(word: &str, basic_definition: Option<&str>) -> String {
        let mut prompt = format!(
            "Explain the English word \"{word}\". Return a JSON object with the keys \
             basic_translation, detailed_explanation, pronunciation (IPA), etymology, \
             memory_tips, usage_notes, common_collocations (array of strings), examples \
             (array of at least three {{\"sentence\", \"translation\"}} objects), synonyms, \
             antonyms, related_words (arrays of strings), difficulty_level \
             (beginner/intermediate/advanced) and frequency (common/uncommon/rare)."
        );
        if let Some(definition) = basic_definition.filter(|d| !d.trim().is_empty()) {
            prompt.push_str(&format!("\nKnown meaning: {}", definition));
        }
        prompt
    }

    fn request_body(&self, word: &str, basic_definition: Option<&str>) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": Self::user_prompt(word, basic_definition)}
            ],
            "temperature": 0.7,
            "response_format": {"type": "json_object"}
        })
    }

    /// Pull the message content of the first choice and parse it as JSON
    fn extract_content(json: &Value) -> MtResult<Value> {
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                MtError::InvalidResponse("missing 'choices[0].message.content'".to_string())
            })?;

        serde_json::from_str(content)
            .map_err(|e| MtError::InvalidResponse(format!("content is not JSON: {}", e)))
    }
}

impl std::fmt::Debug for OpenAiExplainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiExplainer")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl WordExplainer for OpenAiExplainer {
    async fn explain(
        &self,
        word: &str,
        basic_definition: Option<&str>,
    ) -> MtResult<LlmExplanation> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(word, basic_definition);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(if status.is_client_error() {
                MtError::ConfigError(format!("API client error ({}): {}", status, error_text))
            } else {
                MtError::InvalidResponse(format!("API server error ({}): {}", status, error_text))
            });
        }

        let json: Value = response.json().await.map_err(|e| {
            MtError::InvalidResponse(format!("Failed to parse API response: {}", e))
        })?;

        let data = Self::extract_content(&json)?;
        Ok(LlmExplanation::from_model_json(word, &data))
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }
}
