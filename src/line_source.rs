/*!
 * Sources of raw page lines.
 *
 * A line source answers "what text lines are on page N", in extraction
 * order. `Ok(None)` means the page is out of range or carries no text,
 * which callers treat differently from a page without a root.
 */

use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::SourceError;

/// Ordered text lines per page
pub trait LineSource {
    /// Number of pages in the document
    fn page_count(&self) -> usize;

    /// Lines of a 0-based page, or `None` for an out-of-range or textless page
    fn get_lines(&self, page: usize) -> Result<Option<Vec<String>>, SourceError>;
}

/// Split a page's text into lines, or `None` if the page has no text at all
pub fn page_text_to_lines(text: &str) -> Option<Vec<String>> {
    if text.trim().is_empty() {
        return None;
    }
    Some(text.lines().map(str::to_string).collect())
}

/// Line source backed by a PDF file, extracted once on open
pub struct PdfLineSource {
    path: PathBuf,
    pages: Vec<String>,
}

impl PdfLineSource {
    /// Read and extract every page of the PDF at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let bytes = std::fs::read(&path)
            .map_err(|e| SourceError::Read(format!("{}: {}", path.display(), e)))?;

        let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
            .map_err(|e| SourceError::Extraction(format!("{}: {}", path.display(), e)))?;

        debug!("Extracted {} page(s) from {}", pages.len(), path.display());
        Ok(Self { path, pages })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSource for PdfLineSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn get_lines(&self, page: usize) -> Result<Option<Vec<String>>, SourceError> {
        Ok(self.pages.get(page).and_then(|text| page_text_to_lines(text)))
    }
}

/// Line source over pages already held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLineSource {
    pages: Vec<String>,
}

impl MemoryLineSource {
    /// Build from whole-page texts (lines separated by `\n`)
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from per-page line lists
    pub fn from_lines(pages: Vec<Vec<&str>>) -> Self {
        Self {
            pages: pages.into_iter().map(|lines| lines.join("\n")).collect(),
        }
    }
}

impl LineSource for MemoryLineSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn get_lines(&self, page: usize) -> Result<Option<Vec<String>>, SourceError> {
        Ok(self.pages.get(page).and_then(|text| page_text_to_lines(text)))
    }
}
