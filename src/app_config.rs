use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::page::{HebrewRanges, SegmenterOptions};
use crate::page::segmenter::DEFAULT_SENTINEL;

/// Settings loaded from `conf.json`; every field has a default so partial files are accepted
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Dictionary PDF to read roots from
    #[serde(default = "default_pdf_path")]
    pub pdf_path: String,

    /// JSON history of published roots and pages
    #[serde(default = "default_state_path")]
    pub state_path: String,

    /// Where the formatted digest is written before sending
    #[serde(default = "default_preview_path")]
    pub preview_path: String,

    /// Page layout knowledge
    #[serde(default)]
    pub parsing: ParsingConfig,

    /// Page search limits
    #[serde(default)]
    pub search: SearchConfig,

    /// LLM enrichment settings
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Telegram delivery settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Page layout knowledge used by the segmenter
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ParsingConfig {
    /// Heading word printed right before the root
    #[serde(default = "default_sentinel_label")]
    pub sentinel_label: String,

    /// Lines repeated on every page, dropped on exact match
    #[serde(default)]
    pub boilerplate_lines: Vec<String>,

    /// Treat U+FB1D..U+FB4F as Hebrew
    #[serde(default = "default_true")]
    pub include_presentation_forms: bool,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            sentinel_label: default_sentinel_label(),
            boilerplate_lines: Vec::new(),
            include_presentation_forms: true,
        }
    }
}

impl ParsingConfig {
    pub fn segmenter_options(&self) -> SegmenterOptions {
        SegmenterOptions {
            sentinel_label: self.sentinel_label.clone(),
            boilerplate_lines: self.boilerplate_lines.clone(),
            ranges: HebrewRanges {
                include_presentation_forms: self.include_presentation_forms,
            },
        }
    }
}

/// How far a run looks for an unpublished root
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchConfig {
    /// Pages tried per run
    #[serde(default = "default_search_window")]
    pub search_window: usize,

    /// Page upper bound, clamped to the document
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Enrich when the page yields fewer entries than this
    #[serde(default = "default_min_entries")]
    pub min_entries: usize,

    /// Words listed in one message
    #[serde(default = "default_max_message_words")]
    pub max_message_words: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_window: default_search_window(),
            max_pages: default_max_pages(),
            min_entries: default_min_entries(),
            max_message_words: default_max_message_words(),
        }
    }
}

/// Enrichment provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: Ollama
    Ollama,
    // @provider: Anthropic
    Anthropic,
}

impl EnrichmentProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::Ollama => "Ollama",
            Self::Anthropic => "Anthropic",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }

    // @returns: Whether the provider needs an API key
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

impl std::fmt::Display for EnrichmentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for EnrichmentProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: EnrichmentProvider) -> Self {
        let (model, endpoint) = match provider_type {
            EnrichmentProvider::Gemini => (default_gemini_model(), default_gemini_endpoint()),
            EnrichmentProvider::Ollama => (default_ollama_model(), default_ollama_endpoint()),
            EnrichmentProvider::Anthropic => (default_anthropic_model(), default_anthropic_endpoint()),
        };
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model,
            api_key: String::new(),
            endpoint,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Enrichment service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnrichmentConfig {
    /// Whether sparse pages are topped up with generated words
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Provider to use
    #[serde(default)]
    pub provider: EnrichmentProvider,

    /// Available providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Words requested per root
    #[serde(default = "default_word_count")]
    pub word_count: usize,

    /// Sampling temperature, 0.0 to 1.0
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Extra attempts after a retryable failure
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// First backoff delay in ms, doubled per attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: EnrichmentProvider::default(),
            available_providers: vec![
                ProviderConfig::new(EnrichmentProvider::Gemini),
                ProviderConfig::new(EnrichmentProvider::Ollama),
                ProviderConfig::new(EnrichmentProvider::Anthropic),
            ],
            word_count: default_word_count(),
            temperature: default_temperature(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl EnrichmentConfig {
    /// Entry in `available_providers` matching `provider`
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    pub fn get_provider_config(&self, provider_type: &EnrichmentProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider, inserting defaults if absent
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let index = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider.clone()));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[index]
    }

    /// Configured model, or the provider's default
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            EnrichmentProvider::Gemini => default_gemini_model(),
            EnrichmentProvider::Ollama => default_ollama_model(),
            EnrichmentProvider::Anthropic => default_anthropic_model(),
        }
    }

    /// Empty when the provider has no entry
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Configured endpoint, or the provider's public default
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            EnrichmentProvider::Gemini => default_gemini_endpoint(),
            EnrichmentProvider::Ollama => default_ollama_endpoint(),
            EnrichmentProvider::Anthropic => default_anthropic_endpoint(),
        }
    }

    /// Zero falls back to the default timeout
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or_else(default_timeout_secs)
    }

    /// Whether enrichment can actually run (enabled and credentials present)
    pub fn is_usable(&self) -> bool {
        self.enabled && (!self.provider.requires_api_key() || !self.get_api_key().is_empty())
    }
}

/// Telegram delivery configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TelegramConfig {
    /// Bot token; empty means print instead of sending
    #[serde(default = "String::new")]
    pub bot_token: String,

    /// Destination chat
    #[serde(default = "String::new")]
    pub chat_id: String,

    /// Bot API base URL
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,

    /// Message markup
    #[serde(default = "default_parse_mode")]
    pub parse_mode: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base: default_telegram_api_base(),
            parse_mode: default_parse_mode(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_pdf_path() -> String {
    "roots.pdf".to_string()
}

fn default_state_path() -> String {
    "history.json".to_string()
}

fn default_preview_path() -> String {
    "message_preview.md".to_string()
}

fn default_sentinel_label() -> String {
    DEFAULT_SENTINEL.to_string()
}

fn default_search_window() -> usize {
    10
}

fn default_max_pages() -> usize {
    262 // page count of the dictionary this tool was built around
}

fn default_min_entries() -> usize {
    10
}

fn default_max_message_words() -> usize {
    16
}

fn default_word_count() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.4
}

fn default_true() -> bool {
    true
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash-exp".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_parse_mode() -> String {
    "Markdown".to_string()
}

impl Config {
    /// Load the configuration at `path`, writing a default one if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok((config, false));
        }

        let config = Config::default();
        let json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;
        Ok((config, true))
    }

    /// Rejects settings that would make a run meaningless before any I/O happens
    pub fn validate(&self) -> Result<()> {
        if self.parsing.sentinel_label.trim().is_empty() {
            return Err(anyhow!("Sentinel label must not be empty"));
        }

        if self.search.search_window == 0 {
            return Err(anyhow!("Search window must be at least one page"));
        }

        for provider in &self.enrichment.available_providers {
            if provider.endpoint.is_empty() {
                continue;
            }
            url::Url::parse(&provider.endpoint)
                .with_context(|| format!("Invalid endpoint for provider '{}': {}", provider.provider_type, provider.endpoint))?;
        }

        url::Url::parse(&self.telegram.api_base)
            .with_context(|| format!("Invalid Telegram API base: {}", self.telegram.api_base))?;

        Ok(())
    }

    pub fn segmenter_options(&self) -> SegmenterOptions {
        self.parsing.segmenter_options()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pdf_path: default_pdf_path(),
            state_path: default_state_path(),
            preview_path: default_preview_path(),
            parsing: ParsingConfig::default(),
            search: SearchConfig::default(),
            enrichment: EnrichmentConfig::default(),
            telegram: TelegramConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
