/*!
 * Provider dispatch for enrichment requests.
 */

use async_trait::async_trait;

use crate::app_config::{EnrichmentConfig, EnrichmentProvider};
use crate::enrichment::TextGenerator;
use crate::errors::ProviderError;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::gemini::{Gemini, GeminiRequest};
use crate::providers::ollama::{GenerationRequest, Ollama};
use crate::providers::{Provider, RetryPolicy};

const ANTHROPIC_MAX_TOKENS: u32 = 4096;

/// Enrichment provider implementation variants
#[derive(Debug)]
pub enum EnrichmentClient {
    /// Google Gemini
    Gemini {
        client: Gemini,
        model: String,
        temperature: f32,
    },

    /// Local Ollama server
    Ollama {
        client: Ollama,
        model: String,
        temperature: f32,
    },

    /// Anthropic Messages API
    Anthropic {
        client: Anthropic,
        model: String,
        temperature: f32,
    },
}

impl EnrichmentClient {
    /// Build the client for the configured provider
    pub fn from_config(config: &EnrichmentConfig) -> Self {
        let retry = RetryPolicy::new(config.retry_count, config.retry_backoff_ms);
        let model = config.get_model();
        let endpoint = config.get_endpoint();
        let timeout_secs = config.get_timeout_secs();
        let temperature = config.temperature;

        match config.provider {
            EnrichmentProvider::Gemini => Self::Gemini {
                client: Gemini::new(config.get_api_key(), endpoint, model.clone(), timeout_secs, retry),
                model,
                temperature,
            },
            EnrichmentProvider::Ollama => Self::Ollama {
                client: Ollama::new(endpoint, model.clone(), timeout_secs, retry),
                model,
                temperature,
            },
            EnrichmentProvider::Anthropic => Self::Anthropic {
                client: Anthropic::new(config.get_api_key(), endpoint, model.clone(), timeout_secs, retry),
                model,
                temperature,
            },
        }
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::Gemini { .. } => "Gemini",
            Self::Ollama { .. } => "Ollama",
            Self::Anthropic { .. } => "Anthropic",
        }
    }
}

#[async_trait]
impl TextGenerator for EnrichmentClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        match self {
            Self::Gemini { client, model, temperature } => {
                let request = GeminiRequest::new(model.clone(), prompt)
                    .system(system)
                    .temperature(*temperature)
                    .json_output();
                let response = client.complete(request).await?;
                Ok(Gemini::extract_text(&response))
            }
            Self::Ollama { client, model, temperature } => {
                let request = GenerationRequest::new(model.clone(), prompt)
                    .system(system)
                    .temperature(*temperature);
                let response = client.complete(request).await?;
                Ok(Ollama::extract_text(&response))
            }
            Self::Anthropic { client, model, temperature } => {
                let request = AnthropicRequest::new(model.clone(), ANTHROPIC_MAX_TOKENS)
                    .system(system)
                    .add_message("user", prompt)
                    .temperature(*temperature);
                let response = client.complete(request).await?;
                Ok(Anthropic::extract_text(&response))
            }
        }
    }

    async fn check_connection(&self) -> Result<(), ProviderError> {
        match self {
            Self::Gemini { client, .. } => client.test_connection().await,
            Self::Ollama { client, .. } => client.test_connection().await,
            Self::Anthropic { client, .. } => client.test_connection().await,
        }
    }
}
