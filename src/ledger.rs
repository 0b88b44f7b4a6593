/*!
 * Bookkeeping of roots and pages already published.
 *
 * The ledger is the only cross-run state. It is passed to the controller
 * explicitly so the page engine itself stays stateless.
 */

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Record of published roots and their pages
pub trait RootLedger {
    /// Whether `root` has been published before
    fn contains(&self, root: &str) -> bool;

    /// Mark `root` (found on `page`) as published
    fn record(&mut self, root: &str, page: usize) -> Result<(), LedgerError>;

    /// Highest page recorded so far
    fn last_page(&self) -> Option<usize>;

    /// First page a new search should look at
    fn next_page(&self) -> usize {
        self.last_page().map_or(0, |page| page + 1)
    }
}

/// On-disk shape of the history file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub used_roots: Vec<String>,
    #[serde(default)]
    pub used_pages: Vec<usize>,
}

impl History {
    fn insert(&mut self, root: &str, page: usize) {
        if !root.is_empty() && !self.used_roots.iter().any(|r| r == root) {
            self.used_roots.push(root.to_string());
        }
        if !self.used_pages.contains(&page) {
            self.used_pages.push(page);
        }
    }
}

/// Ledger persisted as pretty-printed JSON, rewritten on every record
#[derive(Debug)]
pub struct JsonLedger {
    path: PathBuf,
    history: History,
}

impl JsonLedger {
    /// Load the ledger at `path`. A missing or unreadable file yields an empty ledger.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let history = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ledger {} is not valid JSON ({}), starting empty", path.display(), e);
                History::default()
            }),
            Err(e) => {
                debug!("No ledger at {} ({}), starting empty", path.display(), e);
                History::default()
            }
        };
        Self { path, history }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the ledger to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(&self.history)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| LedgerError::Io(format!("{}: {}", parent.display(), e)))?;
        }

        std::fs::write(&self.path, json)
            .map_err(|e| LedgerError::Io(format!("{}: {}", self.path.display(), e)))
    }
}

impl RootLedger for JsonLedger {
    fn contains(&self, root: &str) -> bool {
        self.history.used_roots.iter().any(|r| r == root)
    }

    fn record(&mut self, root: &str, page: usize) -> Result<(), LedgerError> {
        self.history.insert(root, page);
        self.save()
    }

    fn last_page(&self) -> Option<usize> {
        self.history.used_pages.iter().copied().max()
    }
}

/// Ledger kept in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    roots: HashSet<String>,
    pages: Vec<usize>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RootLedger for MemoryLedger {
    fn contains(&self, root: &str) -> bool {
        self.roots.contains(root)
    }

    fn record(&mut self, root: &str, page: usize) -> Result<(), LedgerError> {
        if !root.is_empty() {
            self.roots.insert(root.to_string());
        }
        if !self.pages.contains(&page) {
            self.pages.push(page);
        }
        Ok(())
    }

    fn last_page(&self) -> Option<usize> {
        self.pages.iter().copied().max()
    }
}
