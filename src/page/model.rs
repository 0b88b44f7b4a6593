/*!
 * Data shapes produced by page segmentation.
 */

use serde::{Deserialize, Serialize};

/// One dictionary entry listed under a page root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Headword with vowel points, in logical order
    pub vocalized: String,

    /// Unpointed headword when the page prints one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain: Option<String>,

    /// Latin-script gloss, joined across source lines with single spaces
    pub description: String,
}

impl EntryRecord {
    pub fn new(vocalized: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            vocalized: vocalized.into(),
            plain: None,
            description: description.into(),
        }
    }

    /// Append a gloss continuation line
    pub fn extend_description(&mut self, more: &str) {
        if more.is_empty() {
            return;
        }
        if !self.description.is_empty() {
            self.description.push(' ');
        }
        self.description.push_str(more);
    }

    /// Offer a plain-form candidate; a shorter candidate never replaces a longer one.
    pub fn offer_plain(&mut self, candidate: &str) {
        let replace = match &self.plain {
            None => true,
            Some(current) => candidate.chars().count() >= current.chars().count(),
        };
        if replace {
            self.plain = Some(candidate.to_string());
        }
    }
}

/// Root plus entries recovered from a single page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// Root heading in logical order, never empty
    pub root: String,

    /// Entries in source order; may be empty
    pub entries: Vec<EntryRecord>,
}

/// How a single body line contributes to the entry stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Hebrew headword and Latin gloss on one line: opens an entry
    NewEntry { hebrew: String, latin: String },
    /// Hebrew only: candidate plain form for the open entry
    HebrewContinuation(String),
    /// Latin only: more gloss for the open entry
    LatinContinuation(String),
    /// Nothing usable
    Noise,
}
