/*!
 * Scripted provider for exercising enrichment without a network.
 *
 * The reply size follows the count asked for in the prompt, so callers can
 * check that the requested number of words comes back.
 */

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::enrichment::TextGenerator;
use crate::errors::ProviderError;
use crate::providers::Provider;

static REQUESTED_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"generate (\d+) distinct").unwrap());

#[derive(Debug, Clone)]
pub struct MockRequest {
    pub system: String,
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub text: String,
}

/// What the provider replies with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Bare JSON word list
    Working,
    /// Word list inside a ```json fence
    Fenced,
    /// Prose, no JSON
    Malformed,
    /// Every `fail_every`-th request returns a 503
    Intermittent { fail_every: usize },
    /// Every request returns a 500
    Failing,
    /// Empty reply text
    Empty,
}

/// Provider that never touches the network
#[derive(Debug)]
pub struct MockProvider {
    behavior: MockBehavior,
    /// Shared between clones
    request_count: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn fenced() -> Self {
        Self::new(MockBehavior::Fenced)
    }

    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Number of requests served so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// A JSON word list with `count` entries
    pub fn generate_words_response(count: usize) -> String {
        let words: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "hebrew": format!("\u{05DE}\u{05B4}\u{05DC}\u{05BC}\u{05B8}\u{05D4} {}", i + 1),
                    "transliteration": format!("mila {}", i + 1),
                    "type": "Noun",
                    "translation": format!("word {}", i + 1),
                    "example": { "hebrew": "\u{05D6}\u{05D5} \u{05DE}\u{05B4}\u{05DC}\u{05BC}\u{05B8}\u{05D4}", "english": "This is a word" }
                })
            })
            .collect();
        serde_json::Value::Array(words).to_string()
    }

    fn requested_count(prompt: &str) -> usize {
        REQUESTED_COUNT
            .captures(prompt)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(3)
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        let words = || Self::generate_words_response(Self::requested_count(&request.prompt));

        let text = match self.behavior {
            MockBehavior::Working => words(),
            MockBehavior::Fenced => format!("```json\n{}\n```", words()),
            MockBehavior::Malformed => "Sorry, I cannot list words for this root.".to_string(),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    return Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    });
                }
                words()
            }
            MockBehavior::Failing => {
                return Err(ProviderError::ApiError {
                    message: "Simulated provider failure".to_string(),
                    status_code: 500,
                })
            }
            MockBehavior::Empty => String::new(),
        };

        Ok(MockResponse { text })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated outage".to_string())),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}

#[async_trait]
impl TextGenerator for MockProvider {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        let request = MockRequest {
            system: system.to_string(),
            prompt: prompt.to_string(),
        };
        let response = self.complete(request).await?;
        Ok(Self::extract_text(&response))
    }

    async fn check_connection(&self) -> Result<(), ProviderError> {
        self.test_connection().await
    }
}
