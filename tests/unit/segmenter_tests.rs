/*!
 * Tests for page segmentation
 */

use shoresh::page::{HebrewRanges, LineKind, PageSegmenter, SegmenterOptions};
use shoresh::ParseError;

use crate::common::{self, CREDIT_LINE, ROOT_KTV, ROOT_SHMR};

fn segmenter() -> PageSegmenter {
    PageSegmenter::new(SegmenterOptions {
        boilerplate_lines: vec![CREDIT_LINE.to_string()],
        ..SegmenterOptions::default()
    })
}

/// Body lines of a page with three entries and continuations
fn body() -> Vec<String> {
    vec![
        format!("{} to write", common::visual("\u{05DB}\u{05EA}\u{05D1}")),
        common::visual("\u{05DB}\u{05EA}\u{05D1}"),
        "by hand".to_string(),
        format!("{} letter", common::visual("\u{05DE}\u{05DB}\u{05EA}\u{05D1}")),
        format!("{} writing", common::visual("\u{05DB}\u{05EA}\u{05D9}\u{05D1}\u{05D4}")),
        "or script".to_string(),
    ]
}

fn with_heading(root: &str, body: Vec<String>) -> Vec<String> {
    let mut lines = vec!["Racine".to_string(), common::visual(root)];
    lines.extend(body);
    lines
}

#[test]
fn test_segment_withEmptyInput_shouldFailWithNoRoot() {
    let lines: Vec<String> = Vec::new();
    assert_eq!(
        segmenter().segment(&lines),
        Err(ParseError::NoRoot { sentinel: "Racine".to_string() })
    );
}

#[test]
fn test_segment_withCustomSentinel_shouldUseIt() {
    let options = SegmenterOptions {
        sentinel_label: "Root".to_string(),
        ..SegmenterOptions::default()
    };
    let mut lines = vec!["Root".to_string(), common::visual(ROOT_SHMR)];
    lines.extend(body());

    let page = PageSegmenter::new(options).segment(&lines).unwrap();
    assert_eq!(page.root, ROOT_SHMR);
    assert_eq!(page.entries.len(), 3);
}

#[test]
fn test_segment_entryCount_shouldEqualNewEntryLines() {
    let segmenter = segmenter();
    let lines = with_heading(ROOT_KTV, body());

    let new_entries = lines[2..]
        .iter()
        .filter(|line| matches!(segmenter.classify(line), LineKind::NewEntry { .. }))
        .count();

    let page = segmenter.segment(&lines).unwrap();
    assert_eq!(page.entries.len(), new_entries);
    assert_eq!(page.entries.len(), 3);
    assert_eq!(page.entries[0].description, "to write by hand");
    assert_eq!(page.entries[0].plain.as_deref(), Some("\u{05DB}\u{05EA}\u{05D1}"));
    assert_eq!(page.entries[1].description, "letter");
    assert_eq!(page.entries[2].description, "writing or script");
}

#[test]
fn test_segment_reorderingNoiseLines_shouldNotChangeEntries() {
    let segmenter = segmenter();
    let baseline = segmenter.segment(&with_heading(ROOT_KTV, body())).unwrap();

    let noise = ["", "   ", CREDIT_LINE];
    let body_len = body().len();
    for position in 0..=body_len {
        for noise_line in noise {
            let mut shuffled = body();
            shuffled.insert(position, noise_line.to_string());
            shuffled.insert(0, CREDIT_LINE.to_string());
            shuffled.push(String::new());

            let page = segmenter.segment(&with_heading(ROOT_KTV, shuffled)).unwrap();
            assert_eq!(page, baseline, "noise {:?} at {}", noise_line, position);
        }
    }
}

#[test]
fn test_segment_withShorterPlainCandidate_shouldKeepLonger() {
    let lines = with_heading(
        ROOT_KTV,
        vec![
            format!("{} to write", common::visual("\u{05DB}\u{05EA}\u{05D1}")),
            common::visual("\u{05DB}\u{05EA}\u{05D5}\u{05D1}"),
            common::visual("\u{05DB}\u{05EA}"),
        ],
    );

    let page = segmenter().segment(&lines).unwrap();
    assert_eq!(page.entries[0].plain.as_deref(), Some("\u{05DB}\u{05EA}\u{05D5}\u{05D1}"));
}

#[test]
fn test_segment_withEqualLengthPlainCandidate_shouldTakeLatest() {
    let lines = with_heading(
        ROOT_KTV,
        vec![
            format!("{} to write", common::visual("\u{05DB}\u{05EA}\u{05D1}")),
            common::visual("\u{05D0}\u{05D1}"),
            common::visual("\u{05D2}\u{05D3}"),
        ],
    );

    let page = segmenter().segment(&lines).unwrap();
    assert_eq!(page.entries[0].plain.as_deref(), Some("\u{05D2}\u{05D3}"));
}

#[test]
fn test_classify_withMultiWordHebrew_shouldKeepPhraseTogether() {
    // Visual order of "אב גד"
    let line = "\u{05D3}\u{05D2} \u{05D1}\u{05D0} two words";
    match segmenter().classify(line) {
        LineKind::NewEntry { hebrew, latin } => {
            assert_eq!(hebrew, "\u{05D0}\u{05D1} \u{05D2}\u{05D3}");
            assert_eq!(latin, "two words");
        }
        other => panic!("unexpected kind {:?}", other),
    }
}

#[test]
fn test_classify_withAbbreviationQuote_shouldStayInRun() {
    // Visual order of צה"ל
    let line = "\u{05DC}\"\u{05D4}\u{05E6} army";
    match segmenter().classify(line) {
        LineKind::NewEntry { hebrew, latin } => {
            assert_eq!(hebrew, "\u{05E6}\u{05D4}\"\u{05DC}");
            assert_eq!(latin, "army");
        }
        other => panic!("unexpected kind {:?}", other),
    }
}

#[test]
fn test_classify_withPresentationForm_shouldDependOnRanges() {
    // Shin with shin dot, precomposed
    let line = "\u{FB2A}";
    let with_forms = PageSegmenter::default();
    let block_only = PageSegmenter::new(SegmenterOptions {
        ranges: HebrewRanges::block_only(),
        ..SegmenterOptions::default()
    });

    // A single presentation-form letter is too short to be a plain form
    assert_eq!(with_forms.classify(line), LineKind::Noise);
    assert_eq!(block_only.classify(line), LineKind::LatinContinuation(line.to_string()));
    assert!(with_forms.split_line(line).has_hebrew);
    assert!(!block_only.split_line(line).has_hebrew);
}

#[test]
fn test_segment_withRootCitationInBody_shouldDropIt() {
    let mut lines = with_heading(ROOT_KTV, body());
    lines.insert(4, common::visual(ROOT_KTV));
    lines.push(ROOT_KTV.to_string());

    let page = segmenter().segment(&lines).unwrap();
    assert_eq!(page, segmenter().segment(&with_heading(ROOT_KTV, body())).unwrap());
}

#[test]
fn test_segment_withSentinelWordInGloss_shouldKeepEntry() {
    let lines = with_heading(
        ROOT_KTV,
        vec![
            format!("{} to write", common::visual("\u{05DB}\u{05EA}\u{05D1}")),
            format!("{} Racine (botany)", common::visual("\u{05E9}\u{05E8}\u{05E9}")),
            "of a plant".to_string(),
            "  Racine ".to_string(),
        ],
    );

    let page = segmenter().segment(&lines).unwrap();
    assert_eq!(page.entries.len(), 2);
    assert_eq!(page.entries[0].description, "to write");
    assert_eq!(page.entries[1].vocalized, "\u{05E9}\u{05E8}\u{05E9}");
    assert_eq!(page.entries[1].description, "Racine (botany) of a plant");
}
