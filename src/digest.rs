/*!
 * Formatting of the daily root message.
 *
 * Dictionary entries and enriched words are rendered from their own
 * fields; neither kind borrows fields from the other.
 *
 * Output targets Telegram's legacy `Markdown` parse mode. Field values are
 * escaped so page or model text cannot open an entity that is never closed.
 */

use serde::Serialize;

use crate::enrichment::EnrichedWord;
use crate::page::{EntryRecord, PageResult};

/// Characters that open an entity in legacy Markdown
const MARKDOWN_SPECIAL: [char; 4] = ['_', '*', '`', '['];

/// Escape text placed outside an entity
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Wrap text in bold. Escapes do not work inside an entity, so `*` is dropped.
fn bold(text: &str) -> String {
    format!("*{}*", text.replace('*', ""))
}

/// A word listed in the digest
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum DigestWord {
    /// Entry read from the dictionary page
    Dictionary(EntryRecord),
    /// Word supplied by the enrichment provider
    Enriched(EnrichedWord),
}

impl DigestWord {
    fn render(&self, lines: &mut Vec<String>) {
        match self {
            DigestWord::Dictionary(entry) => {
                lines.push(bold(&entry.vocalized));
                if let Some(plain) = &entry.plain {
                    lines.push(format!("Plain: {}", escape_markdown(plain)));
                }
                lines.push(format!("Translation: {}", escape_markdown(&entry.description)));
            }
            DigestWord::Enriched(word) => {
                lines.push(bold(&word.hebrew));
                if let Some(kind) = word.part_of_speech.as_deref().filter(|s| !s.is_empty()) {
                    lines.push(format!("Description of type: {}", escape_markdown(kind)));
                }
                if let Some(translit) = word.transliteration.as_deref().filter(|s| !s.is_empty()) {
                    lines.push(format!("Transliteration: {}", escape_markdown(translit)));
                }
                lines.push(format!("Translation: {}", escape_markdown(&word.translation)));
                if let Some(example) = word.example.as_ref().filter(|e| !e.hebrew.is_empty()) {
                    lines.push(format!(
                        "Example: {} ({})",
                        escape_markdown(&example.hebrew),
                        escape_markdown(&example.english)
                    ));
                }
            }
        }
    }
}

/// Everything published for one root
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Digest {
    pub root: String,
    pub page: usize,
    pub words: Vec<DigestWord>,
    /// Whether any word came from enrichment
    pub enriched: bool,
}

impl Digest {
    /// Digest of a segmented page, before enrichment
    pub fn from_page(page_index: usize, page: PageResult) -> Self {
        Self {
            root: page.root,
            page: page_index,
            words: page.entries.into_iter().map(DigestWord::Dictionary).collect(),
            enriched: false,
        }
    }

    /// Append enriched words; the digest is marked enriched only if any were added
    pub fn add_enriched(&mut self, words: Vec<EnrichedWord>) {
        if words.is_empty() {
            return;
        }
        self.enriched = true;
        self.words.extend(words.into_iter().map(DigestWord::Enriched));
    }

    pub fn dictionary_count(&self) -> usize {
        self.words.iter().filter(|w| matches!(w, DigestWord::Dictionary(_))).count()
    }

    /// Render as a Markdown message listing at most `max_words` words
    pub fn format_message(&self, max_words: usize) -> String {
        let mut lines = vec![format!("Daily Shoresh: {}", bold(&self.root))];
        if self.enriched {
            lines.push("(Enriched with external sources)".to_string());
        }
        lines.push(String::new());

        for word in self.words.iter().take(max_words) {
            word.render(&mut lines);
            lines.push(String::new());
        }

        if self.words.len() > max_words {
            lines.push("... (Truncated)".to_string());
        }

        lines.join("\n")
    }
}
