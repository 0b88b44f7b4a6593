/*!
 * Integration tests for the page search and publication cycle
 */

use anyhow::Result;
use shoresh::enrichment::NoEnrichment;
use shoresh::ledger::{JsonLedger, MemoryLedger, RootLedger};
use shoresh::{Controller, RunOptions, RunOutcome};

use crate::common::{
    self, dictionary_page, enriched_word, page_with_entries, source_from, test_config,
    RecordingNotifier, ScriptedEnricher, ROOT_KTV, ROOT_LMD, ROOT_SHMR,
};

/// Empty page, page without heading, then three rooted pages
fn sample_pages() -> Vec<Vec<String>> {
    vec![
        Vec::new(),
        vec!["Preface".to_string(), "no heading here".to_string()],
        page_with_entries(ROOT_KTV, 3),
        page_with_entries(ROOT_SHMR, 3),
        page_with_entries(ROOT_LMD, 1),
    ]
}

fn from_start() -> RunOptions {
    RunOptions {
        preview: false,
        start_page: Some(0),
    }
}

#[test]
fn test_controller_withDefaultConfig_shouldInitialize() -> Result<()> {
    let controller = Controller::with_config(shoresh::Config::default())?;
    assert_eq!(controller.segmenter().options().sentinel_label, "Racine");
    Ok(())
}

#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let mut config = shoresh::Config::default();
    config.search.search_window = 0;
    assert!(Controller::with_config(config).is_err());
}

#[test]
fn test_findNextPage_shouldSkipEmptyPagesMissingRootsAndUsedRoots() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(test_config(temp_dir.path()))?;
    let source = source_from(sample_pages());

    let mut ledger = MemoryLedger::new();
    let found = controller.find_next_page(&source, &ledger, 0)?.expect("a rooted page");
    assert_eq!(found.page, 2);
    assert_eq!(found.result.root, ROOT_KTV);

    ledger.record(ROOT_KTV, 2)?;
    let found = controller.find_next_page(&source, &ledger, 0)?.expect("a rooted page");
    assert_eq!(found.page, 3);
    assert_eq!(found.result.root, ROOT_SHMR);
    Ok(())
}

#[test]
fn test_findNextPage_shouldStopAtSearchWindow() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = test_config(temp_dir.path());
    config.search.search_window = 2;
    let controller = Controller::with_config(config)?;
    let source = source_from(sample_pages());

    assert_eq!(controller.find_next_page(&source, &MemoryLedger::new(), 0)?, None);
    assert!(controller.find_next_page(&source, &MemoryLedger::new(), 1)?.is_some());
    Ok(())
}

#[test]
fn test_findNextPage_shouldStopAtMaxPagesAndDocumentEnd() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = test_config(temp_dir.path());
    config.search.max_pages = 2;
    let controller = Controller::with_config(config)?;
    let source = source_from(sample_pages());

    assert_eq!(controller.find_next_page(&source, &MemoryLedger::new(), 0)?, None);
    assert_eq!(controller.find_next_page(&source, &MemoryLedger::new(), 40)?, None);
    Ok(())
}

#[tokio::test]
async fn test_runCycle_shouldPublishFirstUnusedRoot() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(test_config(temp_dir.path()))?;
    let source = source_from(sample_pages());
    let notifier = RecordingNotifier::new();
    let mut ledger = MemoryLedger::new();
    ledger.record(ROOT_KTV, 2)?;

    let outcome = controller
        .run_cycle(&source, &mut ledger, &NoEnrichment, &notifier, from_start())
        .await?;

    match outcome {
        RunOutcome::Published(digest) => {
            assert_eq!(digest.root, ROOT_SHMR);
            assert_eq!(digest.page, 3);
            assert_eq!(digest.dictionary_count(), 3);
            assert!(!digest.enriched);
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    assert!(ledger.contains(ROOT_SHMR));
    assert_eq!(ledger.next_page(), 4);

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with(&format!("Daily Shoresh: *{}*", ROOT_SHMR)));
    assert!(messages[0].contains("Translation: meaning 1"));

    let preview = std::fs::read_to_string(temp_dir.path().join("message_preview.md"))?;
    assert_eq!(preview, messages[0]);
    Ok(())
}

#[tokio::test]
async fn test_runCycle_withoutStartPage_shouldResumeAfterLastPage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(test_config(temp_dir.path()))?;
    let source = source_from(sample_pages());
    let notifier = RecordingNotifier::new();
    let mut ledger = MemoryLedger::new();
    ledger.record("unrelated", 3)?;

    let outcome = controller
        .run_cycle(&source, &mut ledger, &NoEnrichment, &notifier, RunOptions::default())
        .await?;

    match outcome {
        RunOutcome::Published(digest) => assert_eq!(digest.page, 4),
        other => panic!("unexpected outcome {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_runCycle_inPreviewMode_shouldNotRecord() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(test_config(temp_dir.path()))?;
    let source = source_from(sample_pages());
    let notifier = RecordingNotifier::new();
    let mut ledger = MemoryLedger::new();

    let options = RunOptions {
        preview: true,
        start_page: Some(0),
    };
    let outcome = controller
        .run_cycle(&source, &mut ledger, &NoEnrichment, &notifier, options)
        .await?;

    assert!(matches!(outcome, RunOutcome::Previewed(ref digest) if digest.root == ROOT_KTV));
    assert!(!ledger.contains(ROOT_KTV));
    assert_eq!(ledger.last_page(), None);
    assert_eq!(notifier.messages().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_runCycle_withAllRootsUsed_shouldReportNothingNew() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(test_config(temp_dir.path()))?;
    let source = source_from(sample_pages());
    let notifier = RecordingNotifier::new();
    let mut ledger = MemoryLedger::new();
    for (root, page) in [(ROOT_KTV, 2), (ROOT_SHMR, 3), (ROOT_LMD, 4)] {
        ledger.record(root, page)?;
    }

    let outcome = controller
        .run_cycle(&source, &mut ledger, &NoEnrichment, &notifier, from_start())
        .await?;

    assert_eq!(outcome, RunOutcome::NothingNew);
    assert!(notifier.messages().is_empty());
    assert!(!temp_dir.path().join("message_preview.md").exists());
    Ok(())
}

#[tokio::test]
async fn test_runCycle_withSparsePage_shouldEnrich() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(test_config(temp_dir.path()))?;
    let source = source_from(vec![page_with_entries(ROOT_LMD, 1)]);
    let notifier = RecordingNotifier::new();
    let enricher = ScriptedEnricher::new(vec![
        enriched_word("\u{05DC}\u{05B4}\u{05DE}\u{05BC}\u{05D5}\u{05BC}\u{05D3}", "study"),
        enriched_word("\u{05DE}\u{05B0}\u{05DC}\u{05B7}\u{05DE}\u{05BC}\u{05B5}\u{05D3}", "instructor"),
    ]);
    let mut ledger = MemoryLedger::new();

    let outcome = controller
        .run_cycle(&source, &mut ledger, &enricher, &notifier, from_start())
        .await?;

    assert_eq!(enricher.calls(), 1);
    match outcome {
        RunOutcome::Published(digest) => {
            assert!(digest.enriched);
            assert_eq!(digest.dictionary_count(), 1);
            assert_eq!(digest.words.len(), 3);
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    let message = &notifier.messages()[0];
    assert!(message.contains("(Enriched with external sources)"));
    assert!(message.contains("Translation: instructor"));
    assert!(message.contains("Description of type: Noun"));
    Ok(())
}

#[tokio::test]
async fn test_runCycle_withEnoughEntries_shouldNotEnrich() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(test_config(temp_dir.path()))?;
    let source = source_from(vec![page_with_entries(ROOT_KTV, 2)]);
    let enricher = ScriptedEnricher::new(vec![enriched_word("\u{05D0}\u{05D1}", "unused")]);
    let mut ledger = MemoryLedger::new();

    controller
        .run_cycle(&source, &mut ledger, &enricher, &RecordingNotifier::new(), from_start())
        .await?;

    assert_eq!(enricher.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_runCycle_withFailingNotifier_shouldNotRecord() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(test_config(temp_dir.path()))?;
    let source = source_from(sample_pages());
    let mut ledger = MemoryLedger::new();

    let result = controller
        .run_cycle(&source, &mut ledger, &NoEnrichment, &RecordingNotifier::failing(), from_start())
        .await;

    assert!(result.is_err());
    assert!(!ledger.contains(ROOT_KTV));
    // The preview is still written for inspection
    assert!(temp_dir.path().join("message_preview.md").exists());
    Ok(())
}

#[test]
fn test_runCycle_withJsonLedger_shouldAdvanceAcrossRuns() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = test_config(temp_dir.path());
    let state_path = config.state_path.clone();
    let controller = Controller::with_config(config)?;
    let source = source_from(sample_pages());
    let notifier = RecordingNotifier::new();

    let mut roots = Vec::new();
    for _ in 0..4 {
        let mut ledger = JsonLedger::load(&state_path);
        let outcome = tokio_test::block_on(controller.run_cycle(
            &source,
            &mut ledger,
            &NoEnrichment,
            &notifier,
            RunOptions::default(),
        ))?;
        if let RunOutcome::Published(digest) = outcome {
            roots.push(digest.root);
        }
    }

    assert_eq!(roots, vec![ROOT_KTV, ROOT_SHMR, ROOT_LMD]);
    assert_eq!(notifier.messages().len(), 3);
    Ok(())
}

#[test]
fn test_inspectPage_shouldDistinguishEmptyPagesFromMissingRoots() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(test_config(temp_dir.path()))?;
    let source = source_from(vec![
        Vec::new(),
        vec!["no heading".to_string()],
        dictionary_page(ROOT_KTV, &[("\u{05DB}\u{05EA}\u{05D1}", "to write")]),
    ]);

    assert_eq!(controller.inspect_page(&source, 0)?, None);
    assert!(matches!(controller.inspect_page(&source, 1)?, Some(Err(_))));
    let page = controller.inspect_page(&source, 2)?.expect("text").expect("root");
    assert_eq!(page.root, ROOT_KTV);
    assert_eq!(page.entries[0].vocalized, "\u{05DB}\u{05EA}\u{05D1}");
    assert_eq!(controller.inspect_page(&source, 99)?, None);
    Ok(())
}
