//! Concurrent field translation
//!
//! [`FieldTranslator`] translates many independent texts at once. Every text
//! becomes its own task in a [`JoinSet`], gated by a semaphore, and carries
//! its input index so results are gathered by position rather than by
//! completion order.
//!
//! Failure is per item: an error, a timeout or a panicked task leaves that
//! slot holding its original text while every other slot keeps its
//! translation. Bulk translation therefore never fails as a whole.

use std::sync::Arc;
use std::time::Duration;

use airdict::{MeaningGroup, WordEntry};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::data::{flatten_group, scatter_group, source_texts};
use crate::error::{MtError, MtResult};
use crate::translator::MachineTranslator;

/// Default number of provider calls in flight per bulk translation
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Default time budget for a single provider call
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Scatter/gather translator over an injected provider
#[derive(Clone)]
pub struct FieldTranslator {
    provider: Arc<dyn MachineTranslator>,
    max_concurrency: usize,
    call_timeout: Duration,
}

impl FieldTranslator {
    pub fn new(provider: Arc<dyn MachineTranslator>) -> Self {
        Self {
            provider,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Bound the number of concurrent provider calls (minimum 1)
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Translate one text, falling back to the input on failure
    pub async fn translate_one(&self, text: &str, source: &str, target: &str) -> String {
        self.translate_all(&[text.to_string()], source, target)
            .await
            .into_iter()
            .next()
            .unwrap_or_else(|| text.to_string())
    }

    /// Translate every text concurrently, returning results in input order
    ///
    /// The output always has the same length as `texts`. A text whose
    /// translation fails or times out is returned unchanged.
    pub async fn translate_all(&self, texts: &[String], source: &str, target: &str) -> Vec<String> {
        // Every slot starts out holding its source text
        let mut results = texts.to_vec();
        if texts.is_empty() {
            return results;
        }

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for (index, text) in texts.iter().enumerate() {
            let provider = Arc::clone(&self.provider);
            let semaphore = Arc::clone(&semaphore);
            let text = text.clone();
            let source = source.to_string();
            let target = target.to_string();
            let call_timeout = self.call_timeout;

            tasks.spawn(async move {
                // The semaphore is never closed, so a permit is always granted
                let _permit = semaphore.acquire_owned().await.ok();
                let call = provider.translate(&text, &source, &target);
                let outcome = match tokio::time::timeout(call_timeout, call).await {
                    Ok(result) => result,
                    Err(_) => Err(MtError::Timeout(call_timeout.as_millis() as u64)),
                };
                (index, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(translated))) => {
                    debug!("Translated field {}: {} → {}", index, results[index], translated);
                    results[index] = translated;
                }
                Ok((index, Err(e))) => {
                    warn!("Keeping original text for field {} ({}): {}", index, results[index], e);
                }
                Err(e) => {
                    warn!("Translation task did not complete: {}", e);
                }
            }
        }

        results
    }

    /// Translate every definition text and example of a group
    ///
    /// Returns a new group whose source fields are unchanged and whose
    /// translated fields come from the matching positions.
    pub async fn translate_group(
        &self,
        group: &MeaningGroup,
        source: &str,
        target: &str,
    ) -> MtResult<MeaningGroup> {
        let tasks = flatten_group(group);
        debug!(
            "Translating {} fields of '{}' group via {}",
            tasks.len(),
            group.part_of_speech,
            self.provider_name()
        );
        let translations = self.translate_all(&source_texts(&tasks), source, target).await;
        scatter_group(group, &tasks, translations)
    }

    /// Translate a group, keeping the original group if reassembly fails
    pub async fn enrich_group(&self, group: &MeaningGroup, source: &str, target: &str) -> MeaningGroup {
        let translated = self.translate_group(group, source, target).await;
        settle_group(group, translated)
    }

    /// Enrich every meaning group of an entry in place
    pub async fn enrich_entry(&self, entry: &mut WordEntry, source: &str, target: &str) {
        let mut meanings = Vec::with_capacity(entry.meanings.len());
        for group in &entry.meanings {
            meanings.push(self.enrich_group(group, source, target).await);
        }
        entry.meanings = meanings;
    }
}

/// Fall back to the original group when a translated one could not be built
fn settle_group(group: &MeaningGroup, translated: MtResult<MeaningGroup>) -> MeaningGroup {
    match translated {
        Ok(translated) => translated,
        Err(e) => {
            warn!("Keeping untranslated '{}' group: {}", group.part_of_speech, e);
            group.clone()
        }
    }
}

impl std::fmt::Debug for FieldTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldTranslator")
            .field("provider", &self.provider.provider_name())
            .field("max_concurrency", &self.max_concurrency)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}
