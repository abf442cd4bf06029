//! Similarity scorer properties and the locality-windowed search.

use linealign_core::similarity::{LocalitySearch, normalize};
use linealign_core::{PreparedText, ScoreMode, score};

const PAIRS: &[(&str, &str)] = &[
    ("The quick brown fox.", "The quick brown fox jumps over the lazy dog."),
    ("See Smith, 2020.", "1 See Smith, 2020, at 14."),
    ("zzzz qqqq", "The cat sleeps on the mat."),
    ("", "anything"),
    ("anything", ""),
    ("ﬁnancial", "financial"),
    ("co\u{00AD}operation", "cooperation"),
    ("a", "b"),
];

// ============================================================================
// Range and identity
// ============================================================================

#[test]
fn test_scores_stay_in_unit_interval() {
    for &(a, b) in PAIRS {
        for mode in [ScoreMode::Ratio, ScoreMode::PartialRatio] {
            let s = score(a, b, mode);
            assert!((0.0..=1.0).contains(&s), "{:?} {:?} {:?} -> {}", mode, a, b, s);
        }
    }
}

#[test]
fn test_identical_non_empty_scores_one() {
    for text in ["The quick brown fox.", "1 See Smith, 2020.", "x"] {
        assert_eq!(score(text, text, ScoreMode::Ratio), 1.0);
        assert_eq!(score(text, text, ScoreMode::PartialRatio), 1.0);
    }
}

#[test]
fn test_empty_strings_score_zero() {
    assert_eq!(score("", "", ScoreMode::Ratio), 0.0);
    assert_eq!(score("", "", ScoreMode::PartialRatio), 0.0);
    // whitespace-only normalizes to empty
    assert_eq!(score("  \n", "\t", ScoreMode::Ratio), 0.0);
}

#[test]
fn test_ratio_is_symmetric() {
    for &(a, b) in PAIRS {
        assert_eq!(score(a, b, ScoreMode::Ratio), score(b, a, ScoreMode::Ratio));
    }
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn test_normalization_makes_case_and_ligatures_irrelevant() {
    assert_eq!(score("THE QUICK", "the quick", ScoreMode::Ratio), 1.0);
    assert_eq!(score("ﬁnancial", "financial", ScoreMode::Ratio), 1.0);
    assert_eq!(score("co\u{00AD}operation", "cooperation", ScoreMode::Ratio), 1.0);
    assert_eq!(score("exam-\nple", "example", ScoreMode::Ratio), 1.0);
}

#[test]
fn test_normalize_is_idempotent() {
    for &(a, _) in PAIRS {
        let once = normalize(a);
        assert_eq!(normalize(&once), once);
    }
}

// ============================================================================
// partial_ratio
// ============================================================================

#[test]
fn test_partial_ratio_finds_line_inside_paragraph() {
    let paragraph = "The quick brown fox jumps over the lazy dog. It was not amused.";
    assert_eq!(score("jumps over the lazy dog.", paragraph, ScoreMode::PartialRatio), 1.0);
    assert!(score("jumps over the lazy dog.", paragraph, ScoreMode::Ratio) < 0.6);
}

#[test]
fn test_partial_ratio_tolerates_ocr_noise() {
    let paragraph = "Footnotes are printed at the bottom of the page.";
    let noisy = score("F00tnotes are printcd at the", paragraph, ScoreMode::PartialRatio);
    assert!(noisy > 0.8 && noisy < 1.0, "noisy = {}", noisy);
}

// ============================================================================
// LocalitySearch
// ============================================================================

#[test]
fn test_locality_search_matches_full_scan_above_floor() {
    let references = PreparedText::prepare_all([
        "alpha bravo charlie",
        "delta echo foxtrot",
        "golf hotel india",
        "juliet kilo lima",
        "mike november oscar",
        "papa quebec romeo",
    ]);
    let needle = PreparedText::new("papa quebec romeo");

    let windowed = LocalitySearch::new(1, 0.9).search(&needle, &references, 0);
    let full = LocalitySearch::new(references.len(), 0.9).search(&needle, &references, 0);

    assert_eq!(windowed.best, full.best);
    assert_eq!(windowed.accepted(0.9).map(|m| m.index), Some(5));
}

#[test]
fn test_locality_search_reports_sub_floor_best() {
    let references = PreparedText::prepare_all(["alpha bravo", "charlie delta"]);
    let search = LocalitySearch::new(1, 0.95).search(&PreparedText::new("zzzz"), &references, 0);
    assert!(search.best.is_some());
    assert_eq!(search.accepted(0.95), None);
    assert_eq!(search.scanned, 2);
}
