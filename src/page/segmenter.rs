/*!
 * Entry segmentation for a single dictionary page.
 *
 * The page has no structural markup, so entries are recovered from script
 * composition alone:
 * - the line after the sentinel label is the root heading
 * - a line mixing Hebrew and Latin opens a new entry
 * - a Hebrew-only line offers a plain (unpointed) form for the open entry
 * - a Latin-only line continues the open entry's gloss
 * - everything else is dropped
 */

use serde::{Deserialize, Serialize};

use crate::errors::ParseError;
use crate::page::graphemes::reassemble;
use crate::page::model::{EntryRecord, LineKind, PageResult};
use crate::page::script::{HebrewRanges, is_run_joiner};

/// Label printed right before the root on every page of the dictionary
pub const DEFAULT_SENTINEL: &str = "Racine";

/// Static knowledge about the page layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmenterOptions {
    /// Heading word preceding the root line
    pub sentinel_label: String,

    /// Lines printed on every page (credits, running titles), matched exactly after trimming
    pub boilerplate_lines: Vec<String>,

    /// What counts as a Hebrew character
    pub ranges: HebrewRanges,
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        Self {
            sentinel_label: DEFAULT_SENTINEL.to_string(),
            boilerplate_lines: Vec::new(),
            ranges: HebrewRanges::default(),
        }
    }
}

/// Hebrew and Latin parts of one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitLine {
    /// Hebrew runs in logical order
    pub hebrew: String,
    /// The rest of the line, whitespace-collapsed
    pub latin: String,
    pub has_hebrew: bool,
}

/// Segments raw page lines into a root and its entries
#[derive(Debug, Clone, Default)]
pub struct PageSegmenter {
    options: SegmenterOptions,
}

impl PageSegmenter {
    pub fn new(options: SegmenterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SegmenterOptions {
        &self.options
    }

    /// Segment the ordered lines of one page.
    ///
    /// Fails only with [`ParseError::NoRoot`]; every other irregularity is
    /// absorbed by dropping the offending line.
    pub fn segment<S: AsRef<str>>(&self, lines: &[S]) -> Result<PageResult, ParseError> {
        let (root_index, raw_root) = self.locate_root(lines)?;
        let root = reassemble(raw_root);

        let mut accumulator = EntryAccumulator::default();
        for line in &lines[root_index + 1..] {
            let line = line.as_ref();
            if self.is_noise(line, raw_root, &root) {
                continue;
            }
            accumulator.apply(self.classify(line));
        }

        Ok(PageResult {
            root,
            entries: accumulator.finish(),
        })
    }

    /// Find the root line: the line right after the first sentinel.
    /// Returns its index and trimmed visual text.
    fn locate_root<'a, S: AsRef<str>>(&self, lines: &'a [S]) -> Result<(usize, &'a str), ParseError> {
        let no_root = || ParseError::NoRoot {
            sentinel: self.options.sentinel_label.clone(),
        };

        let sentinel_index = lines
            .iter()
            .position(|line| line.as_ref().contains(&self.options.sentinel_label))
            .ok_or_else(no_root)?;

        let root_index = sentinel_index + 1;
        let raw_root = lines.get(root_index).ok_or_else(no_root)?.as_ref().trim();

        if !self.options.ranges.contains_hebrew(raw_root) {
            return Err(no_root());
        }

        Ok((root_index, raw_root))
    }

    fn is_noise(&self, line: &str, raw_root: &str, root: &str) -> bool {
        let trimmed = line.trim();
        trimmed.is_empty()
            || trimmed == self.options.sentinel_label.trim()
            || self.options.boilerplate_lines.iter().any(|b| b.trim() == trimmed)
            || trimmed == raw_root
            || trimmed == root
    }

    /// Separate the Hebrew runs of a line from everything else.
    ///
    /// A Hebrew run may contain whitespace and quote characters as long as a
    /// Hebrew character follows them, so multi-word phrases stay whole.
    /// Separate runs are joined with a single space before reassembly, not
    /// concatenated, so `hebrew` keeps a word gap between them.
    pub fn split_line(&self, line: &str) -> SplitLine {
        let ranges = &self.options.ranges;
        let chars: Vec<(usize, char)> = line.char_indices().collect();

        let mut runs: Vec<&str> = Vec::new();
        let mut latin = String::with_capacity(line.len());
        let mut i = 0;

        while i < chars.len() {
            let (start, c) = chars[i];
            if !ranges.is_hebrew(c) {
                latin.push(c);
                i += 1;
                continue;
            }

            let mut last_hebrew = i;
            for (j, &(_, next)) in chars.iter().enumerate().skip(i + 1) {
                if ranges.is_hebrew(next) {
                    last_hebrew = j;
                } else if !is_run_joiner(next) {
                    break;
                }
            }

            let (last_pos, last_char) = chars[last_hebrew];
            runs.push(&line[start..last_pos + last_char.len_utf8()]);
            latin.push(' ');
            i = last_hebrew + 1;
        }

        SplitLine {
            hebrew: reassemble(&runs.join(" ")),
            latin: latin.split_whitespace().collect::<Vec<_>>().join(" "),
            has_hebrew: !runs.is_empty(),
        }
    }

    /// Classify a body line. Arms are evaluated top to bottom.
    pub fn classify(&self, line: &str) -> LineKind {
        let SplitLine { hebrew, latin, has_hebrew } = self.split_line(line);

        match (has_hebrew, latin.is_empty()) {
            (true, false) => LineKind::NewEntry { hebrew, latin },
            // A lone mark with no letter to sit on
            (true, true) if hebrew.chars().count() <= 1 => LineKind::Noise,
            (true, true) => LineKind::HebrewContinuation(hebrew),
            (false, false) => LineKind::LatinContinuation(latin),
            (false, true) => LineKind::Noise,
        }
    }
}

/// Owns the currently open entry while lines are walked
#[derive(Debug, Default)]
struct EntryAccumulator {
    closed: Vec<EntryRecord>,
    open: Option<EntryRecord>,
}

impl EntryAccumulator {
    fn apply(&mut self, kind: LineKind) {
        match kind {
            LineKind::NewEntry { hebrew, latin } => {
                self.flush();
                self.open = Some(EntryRecord::new(hebrew, latin));
            }
            LineKind::HebrewContinuation(hebrew) => {
                if let Some(entry) = self.open.as_mut() {
                    entry.offer_plain(&hebrew);
                }
            }
            LineKind::LatinContinuation(latin) => {
                if let Some(entry) = self.open.as_mut() {
                    entry.extend_description(&latin);
                }
            }
            LineKind::Noise => {}
        }
    }

    fn flush(&mut self) {
        if let Some(entry) = self.open.take() {
            self.closed.push(entry);
        }
    }

    fn finish(mut self) -> Vec<EntryRecord> {
        self.flush();
        self.closed
    }
}
