/*!
 * Word enrichment for sparse pages.
 *
 * When a page yields too few entries, an LLM is asked for further words
 * derived from the same root. Failures never abort a run: they are logged
 * and produce an empty list.
 *
 * - `enrichment::client`: provider dispatch built from configuration
 * - `enrichment::prompt`: prompt construction
 * - `enrichment::words`: response parsing into [`EnrichedWord`] records
 */

use async_trait::async_trait;
use log::{debug, error, info};

use crate::errors::ProviderError;

pub mod client;
pub mod prompt;
pub mod words;

pub use client::EnrichmentClient;
pub use words::{EnrichedWord, UsageExample};

/// Anything that can turn a system prompt and a user prompt into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, ProviderError>;

    /// Cheap request that fails if the backend is unreachable or rejects the credentials
    async fn check_connection(&self) -> Result<(), ProviderError>;
}

/// Source of additional words for a root
#[async_trait]
pub trait WordEnricher: Send + Sync {
    /// Words derived from `root`; empty when nothing could be obtained
    async fn words_for_root(&self, root: &str) -> Vec<EnrichedWord>;
}

/// Enricher backed by a text generator
pub struct LlmEnricher<G> {
    generator: G,
    word_count: usize,
}

impl<G: TextGenerator> LlmEnricher<G> {
    pub fn new(generator: G, word_count: usize) -> Self {
        Self { generator, word_count }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }
}

#[async_trait]
impl<G: TextGenerator> WordEnricher for LlmEnricher<G> {
    async fn words_for_root(&self, root: &str) -> Vec<EnrichedWord> {
        let user_prompt = prompt::build_prompt(root, self.word_count);

        let text = match self.generator.generate(prompt::SYSTEM_PROMPT, &user_prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("Enrichment request for root {} failed: {}", root, e);
                return Vec::new();
            }
        };

        match words::parse_words(&text) {
            Ok(found) => {
                info!("Enrichment produced {} word(s) for root {}", found.len(), root);
                found
            }
            Err(e) => {
                error!("Enrichment response for root {} could not be parsed: {}", root, e);
                debug!("Raw enrichment response: {}", text.chars().take(500).collect::<String>());
                Vec::new()
            }
        }
    }
}

/// Enricher that never returns anything, used when enrichment is off
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEnrichment;

#[async_trait]
impl WordEnricher for NoEnrichment {
    async fn words_for_root(&self, _root: &str) -> Vec<EnrichedWord> {
        Vec::new()
    }
}
