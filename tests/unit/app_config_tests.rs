/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use shoresh::app_config::{Config, EnrichmentProvider, LogLevel, ProviderConfig};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.parsing.sentinel_label, "Racine");
    assert!(config.parsing.include_presentation_forms);
    assert_eq!(config.search.search_window, 10);
    assert_eq!(config.search.max_pages, 262);
    assert_eq!(config.search.min_entries, 10);
    assert_eq!(config.search.max_message_words, 16);
    assert_eq!(config.enrichment.provider, EnrichmentProvider::Gemini);
    assert_eq!(config.enrichment.get_model(), "gemini-2.0-flash-exp");
    assert_eq!(config.enrichment.word_count, 10);
    assert_eq!(config.telegram.parse_mode, "Markdown");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.parsing.sentinel_label = "  ".to_string();
    assert!(config.validate().is_err());
    config.parsing.sentinel_label = "Racine".to_string();

    config.search.search_window = 0;
    assert!(config.validate().is_err());
    config.search.search_window = 10;

    config.telegram.api_base = "not a url".to_string();
    assert!(config.validate().is_err());
    config.telegram.api_base = "https://api.telegram.org".to_string();

    config.enrichment.active_provider_config_mut().endpoint = "::bad::".to_string();
    assert!(config.validate().is_err());
    config.enrichment.active_provider_config_mut().endpoint = String::new();

    assert!(config.validate().is_ok());
}

#[test]
fn test_config_withMissingApiKey_shouldStayValidButUnusable() {
    let mut config = Config::default();
    config.enrichment.active_provider_config_mut().api_key = String::new();

    assert!(config.validate().is_ok());
    assert!(!config.enrichment.is_usable());

    config.enrichment.provider = EnrichmentProvider::Ollama;
    assert!(config.enrichment.is_usable());

    config.enrichment.enabled = false;
    assert!(!config.enrichment.is_usable());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let (config, created) = Config::load_or_create(&path)?;
    assert!(created);
    assert!(path.exists());
    assert_eq!(config.search.max_pages, 262);

    let (reloaded, created_again) = Config::load_or_create(&path)?;
    assert!(!created_again);
    assert_eq!(reloaded.pdf_path, config.pdf_path);

    Ok(())
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "pdf_path": "dictionary.pdf",
            "search": { "search_window": 4 },
            "enrichment": {
                "provider": "ollama",
                "available_providers": [
                    { "type": "ollama", "model": "mistral", "endpoint": "http://localhost:11434" }
                ]
            },
            "log_level": "debug"
        }"#,
    )?;

    let (config, created) = Config::load_or_create(&path)?;
    assert!(!created);
    assert_eq!(config.pdf_path, "dictionary.pdf");
    assert_eq!(config.search.search_window, 4);
    assert_eq!(config.search.max_pages, 262);
    assert_eq!(config.enrichment.provider, EnrichmentProvider::Ollama);
    assert_eq!(config.enrichment.get_model(), "mistral");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);

    Ok(())
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_enrichmentProvider_fromStr_shouldAcceptAnyCase() {
    assert_eq!("GEMINI".parse::<EnrichmentProvider>().unwrap(), EnrichmentProvider::Gemini);
    assert_eq!("anthropic".parse::<EnrichmentProvider>().unwrap(), EnrichmentProvider::Anthropic);
    assert!("openai".parse::<EnrichmentProvider>().is_err());
    assert_eq!(EnrichmentProvider::Ollama.to_string(), "ollama");
}

#[test]
fn test_providerConfig_new_shouldUseProviderDefaults() {
    let config = ProviderConfig::new(EnrichmentProvider::Anthropic);
    assert_eq!(config.provider_type, "anthropic");
    assert!(config.model.starts_with("claude"));
}
