/*!
 * Tests for the JSON history file
 */

use anyhow::Result;
use shoresh::ledger::{History, JsonLedger, RootLedger};

use crate::common::{self, ROOT_KTV, ROOT_SHMR};

#[test]
fn test_jsonLedger_withMissingFile_shouldStartEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let ledger = JsonLedger::load(temp_dir.path().join("history.json"));

    assert_eq!(ledger.history(), &History::default());
    assert_eq!(ledger.next_page(), 0);
    assert!(!ledger.contains(ROOT_KTV));
    Ok(())
}

#[test]
fn test_jsonLedger_record_shouldPersistAcrossLoads() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("state").join("history.json");

    let mut ledger = JsonLedger::load(&path);
    ledger.record(ROOT_KTV, 7)?;
    ledger.record(ROOT_SHMR, 9)?;
    assert!(path.exists());

    let reloaded = JsonLedger::load(&path);
    assert!(reloaded.contains(ROOT_KTV));
    assert!(reloaded.contains(ROOT_SHMR));
    assert_eq!(reloaded.last_page(), Some(9));
    assert_eq!(reloaded.next_page(), 10);
    Ok(())
}

#[test]
fn test_jsonLedger_shouldReadExistingHistoryFormat() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "history.json",
        &format!(r#"{{ "used_roots": ["{}"], "used_pages": [3, 12, 5] }}"#, ROOT_KTV),
    )?;

    let ledger = JsonLedger::load(&path);
    assert!(ledger.contains(ROOT_KTV));
    assert_eq!(ledger.next_page(), 13);
    Ok(())
}

#[test]
fn test_jsonLedger_withCorruptFile_shouldStartEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "history.json", "{ used_roots: ")?;

    let mut ledger = JsonLedger::load(&path);
    assert_eq!(ledger.history(), &History::default());

    // The next record overwrites the corrupt content
    ledger.record(ROOT_KTV, 0)?;
    let content = std::fs::read_to_string(&path)?;
    let history: History = serde_json::from_str(&content)?;
    assert_eq!(history.used_roots, vec![ROOT_KTV.to_string()]);
    assert_eq!(history.used_pages, vec![0]);
    Ok(())
}
