use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{error_from_response, Provider, RetryPolicy};

/// Client for a local or remote Ollama server
#[derive(Debug)]
pub struct Ollama {
    /// Without trailing slash
    base_url: String,
    client: Client,
    /// Model used by `test_connection`
    model: String,
    retry: RetryPolicy,
}

/// `/api/generate` request body
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Sampling knobs, omitted when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// `json` forces a JSON reply
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    /// Always `false`; streamed replies are still tolerated
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// The subset of model options enrichment uses
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// `/api/generate` reply, or the last chunk of a stream
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub model: String,
    #[serde(default)]
    pub created_at: String,
    pub response: String,
    #[serde(default)]
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl GenerationRequest {
    /// Non-streaming request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            format: None,
            stream: Some(false),
        }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Join the `response` fields of a JSONL stream, in case the server streamed anyway
fn parse_streamed(text: &str) -> Option<GenerationResponse> {
    let mut parts = Vec::new();
    let mut last = None;
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let chunk: GenerationResponse = serde_json::from_str(line).ok()?;
        parts.push(chunk.response.clone());
        last = Some(chunk);
    }
    last.map(|mut final_chunk| {
        final_chunk.response = parts.concat();
        final_chunk.done = true;
        final_chunk
    })
}

impl Ollama {
    /// `base_url` is the server root, e.g. `http://localhost:11434`
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout_secs: u64, retry: RetryPolicy) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                // Ollama uses HTTP/1.1
                .http1_only()
                .build()
                .unwrap_or_default(),
            model: model.into(),
            retry,
        }
    }

    async fn send(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let response_text = response.text().await?;
        match serde_json::from_str::<GenerationResponse>(&response_text) {
            Ok(generated) => Ok(generated),
            Err(e) => parse_streamed(&response_text).ok_or_else(|| {
                error!("Failed to parse Ollama API response: {}. Raw response (first 500 chars): {}",
                      e, response_text.chars().take(500).collect::<String>());
                ProviderError::ParseError(e.to_string())
            }),
        }
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = GenerationRequest;
    type Response = GenerationResponse;

    async fn complete(&self, request: GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        self.retry.run("Ollama", || self.send(&request)).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.client.get(&url).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    fn extract_text(response: &GenerationResponse) -> String {
        response.response.clone()
    }
}
