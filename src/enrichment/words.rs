use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;

/// Opening fence such as "```json" on its own line
static OPENING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*```[A-Za-z]*\s*\n?").unwrap());
static CLOSING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n?\s*```\s*$").unwrap());

/// Example sentence for an enriched word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageExample {
    #[serde(default)]
    pub hebrew: String,
    #[serde(default)]
    pub english: String,
}

/// A word obtained from an enrichment provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedWord {
    /// Vocalized Hebrew form
    #[serde(default)]
    pub hebrew: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transliteration: Option<String>,

    /// Part of speech, e.g. "Verb - Pa'al"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,

    #[serde(default)]
    pub translation: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<UsageExample>,
}

/// Remove a surrounding Markdown code fence, if any
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let start = OPENING_FENCE.find(trimmed).map_or(0, |m| m.end());
    let body = &trimmed[start..];
    let end = CLOSING_FENCE.find(body).map_or(body.len(), |m| m.start());
    body[..end].trim()
}

/// Parse a provider reply into words.
///
/// The reply must contain a JSON array; text around the array is ignored.
/// Elements that are not objects or lack a Hebrew form are skipped.
pub fn parse_words(text: &str) -> Result<Vec<EnrichedWord>, ProviderError> {
    let body = strip_code_fences(text);

    let values: Vec<serde_json::Value> = match serde_json::from_str(body) {
        Ok(values) => values,
        Err(first_error) => {
            let (start, end) = match (body.find('['), body.rfind(']')) {
                (Some(start), Some(end)) if start < end => (start, end),
                _ => return Err(ProviderError::ParseError(first_error.to_string())),
            };
            serde_json::from_str(&body[start..=end])
                .map_err(|e| ProviderError::ParseError(e.to_string()))?
        }
    };

    Ok(values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<EnrichedWord>(value).ok())
        .map(|mut word| {
            word.hebrew = word.hebrew.trim().to_string();
            word
        })
        .filter(|word| !word.hebrew.is_empty())
        .collect())
}
