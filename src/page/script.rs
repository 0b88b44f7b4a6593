/*!
 * Script classification for extracted dictionary text.
 *
 * Every character is tagged as Hebrew, whitespace, or anything else. The
 * Hebrew test is a configurable set of code point ranges so that the
 * presentation-form block can be switched on or off in one place.
 */

use serde::{Deserialize, Serialize};

/// Hebrew block: base letters, points, cantillation, maqaf and geresh marks
const HEBREW_BLOCK: (char, char) = ('\u{0590}', '\u{05FF}');

/// Alphabetic presentation forms: dotted and ligated Hebrew letters
const HEBREW_PRESENTATION_FORMS: (char, char) = ('\u{FB1D}', '\u{FB4F}');

/// Coarse script tag for a single character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptClass {
    Hebrew,
    Whitespace,
    Other,
}

/// The code point ranges treated as Hebrew
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HebrewRanges {
    /// Whether U+FB1D..=U+FB4F counts as Hebrew
    pub include_presentation_forms: bool,
}

impl Default for HebrewRanges {
    fn default() -> Self {
        Self {
            include_presentation_forms: true,
        }
    }
}

impl HebrewRanges {
    /// Only the main Hebrew block
    pub fn block_only() -> Self {
        Self {
            include_presentation_forms: false,
        }
    }

    pub fn is_hebrew(&self, c: char) -> bool {
        let in_range = |(lo, hi): (char, char)| lo <= c && c <= hi;
        in_range(HEBREW_BLOCK) || (self.include_presentation_forms && in_range(HEBREW_PRESENTATION_FORMS))
    }

    pub fn classify(&self, c: char) -> ScriptClass {
        if self.is_hebrew(c) {
            ScriptClass::Hebrew
        } else if c.is_whitespace() {
            ScriptClass::Whitespace
        } else {
            ScriptClass::Other
        }
    }

    /// True if any character of `text` is Hebrew
    pub fn contains_hebrew(&self, text: &str) -> bool {
        text.chars().any(|c| self.is_hebrew(c))
    }
}

/// Characters allowed inside a Hebrew run without ending it, as long as
/// another Hebrew character follows.
pub(crate) fn is_run_joiner(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\'' | '"' | '\u{2019}' | '\u{201D}')
}
