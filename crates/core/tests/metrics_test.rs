//! Precision/recall/F1 counting, and the training-row export built on the
//! same assignments.

use linealign_core::metrics::count;
use linealign_core::{
    AlgorithmId, AlignConfig, AlignmentResult, Assignment, ClassCounts, Document, Label,
    LabelTaxonomy, ReferenceClass, ReferenceId, evaluate, training_rows,
};

fn body(index: usize) -> ReferenceId {
    ReferenceId::new(ReferenceClass::Body, index)
}

fn footnote(index: usize) -> ReferenceId {
    ReferenceId::new(ReferenceClass::Footnote, index)
}

fn document() -> Document {
    Document::from_texts(
        "metrics",
        &["l0", "l1", "l2", "l3", "l4"],
        &["b0", "b1", "b2"],
        &["f0", "f1"],
    )
}

fn result(doc: &Document, assignments: Vec<Assignment>) -> AlignmentResult {
    AlignmentResult::new(
        AlgorithmId::Baseline,
        AlignConfig::default(),
        assignments,
        doc.lines.len(),
        doc.references(),
    )
    .unwrap()
}

// ============================================================================
// Counting
// ============================================================================

#[test]
fn test_many_to_one_counts_item_once_for_recall() {
    let doc = document();
    let r = result(
        &doc,
        vec![
            Assignment::matched(0, body(0), 0.9),
            Assignment::matched(1, body(0), 0.8),
            Assignment::matched(2, body(0), 0.95),
            Assignment::matched(3, footnote(1), 1.0),
            Assignment::original(4, 0.1),
        ],
    );
    let [b, f] = count(&r, doc.references());
    assert_eq!(b, ClassCounts { tp: 3, fp: 0, fn_: 2 });
    assert_eq!(f, ClassCounts { tp: 1, fp: 0, fn_: 1 });
}

#[test]
fn test_label_without_matching_evidence_is_false_positive() {
    let doc = Document::from_texts("mislabeled", &["l0", "l1"], &["b0"], &["f0"]);
    let r = result(
        &doc,
        vec![
            // body label pointing at a footnote item
            Assignment {
                line_index: 0,
                assigned_label: Label::Body,
                matched_reference: Some(footnote(0)),
                similarity_score: 0.9,
            },
            // footnote label with no reference at all
            Assignment {
                line_index: 1,
                assigned_label: Label::Footnote,
                matched_reference: None,
                similarity_score: 0.0,
            },
        ],
    );
    let [b, f] = count(&r, doc.references());
    assert_eq!(b, ClassCounts { tp: 0, fp: 1, fn_: 1 });
    assert_eq!(f, ClassCounts { tp: 0, fp: 1, fn_: 1 });

    let m = evaluate(&r, doc.references());
    assert_eq!((m.body.precision, m.body.recall, m.body.f1), (0.0, 0.0, 0.0));
    assert_eq!(m.macro_f1, 0.0);
}

#[test]
fn test_all_original_gives_zero_scores() {
    let doc = document();
    let r = result(&doc, (0..5).map(|i| Assignment::original(i, 0.0)).collect());
    let m = evaluate(&r, doc.references());
    assert_eq!(m.body.counts, ClassCounts { tp: 0, fp: 0, fn_: 3 });
    assert_eq!(m.footnote.counts, ClassCounts { tp: 0, fp: 0, fn_: 2 });
    for class in ReferenceClass::ALL {
        let c = m.class(class);
        assert_eq!((c.precision, c.recall, c.f1), (0.0, 0.0, 0.0));
        assert!(!c.f1.is_nan());
    }
    assert_eq!(m.macro_f1, 0.0);
}

#[test]
fn test_macro_f1_averages_classes() {
    let doc = document();
    let r = result(
        &doc,
        vec![
            Assignment::matched(0, body(0), 0.9),
            Assignment::matched(1, body(1), 0.9),
            Assignment::matched(2, body(2), 0.9),
            Assignment::matched(3, footnote(0), 0.9),
            Assignment::original(4, 0.0),
        ],
    );
    let m = evaluate(&r, doc.references());
    assert_eq!(m.body.f1, 1.0);
    // footnote: P = 1, R = 1/2
    assert!((m.footnote.f1 - 2.0 / 3.0).abs() < 1e-12);
    assert!((m.macro_f1 - (1.0 + 2.0 / 3.0) / 2.0).abs() < 1e-12);
}

#[test]
fn test_invalid_results_are_rejected() {
    let doc = document();
    let build = |assignments: Vec<Assignment>| {
        AlignmentResult::new(
            AlgorithmId::TwoPass,
            AlignConfig::default(),
            assignments,
            doc.lines.len(),
            doc.references(),
        )
    };
    // too short
    assert!(build(vec![Assignment::original(0, 0.0)]).is_err());
    // out of range reference
    let mut a: Vec<_> = (0..5).map(|i| Assignment::original(i, 0.0)).collect();
    a[2] = Assignment::matched(2, footnote(7), 0.9);
    assert!(build(a).is_err());
    // score outside [0, 1]
    let mut a: Vec<_> = (0..5).map(|i| Assignment::original(i, 0.0)).collect();
    a[0] = Assignment::original(0, 1.5);
    assert!(build(a).is_err());
    // out of order
    let mut a: Vec<_> = (0..5).map(|i| Assignment::original(i, 0.0)).collect();
    a.swap(0, 1);
    assert!(build(a).is_err());
}

// ============================================================================
// Training rows
// ============================================================================

#[test]
fn test_training_rows_follow_taxonomy() {
    let doc = document();
    let r = result(
        &doc,
        vec![
            Assignment::matched(0, body(0), 0.9),
            Assignment::matched(1, footnote(0), 0.9),
            Assignment::original(2, 0.2),
            Assignment::matched(3, body(1), 0.9),
            Assignment::original(4, 0.0),
        ],
    );

    let rows = training_rows(&doc.lines, &r, &LabelTaxonomy::three_class()).unwrap();
    let labels: Vec<_> = rows.iter().map(|row| (row.label.as_str(), row.label_id)).collect();
    assert_eq!(
        labels,
        vec![("body", 0), ("footnote", 1), ("original", 2), ("body", 0), ("original", 2)]
    );
    assert_eq!(rows[3].text, "l3");

    let classes = ["paragraph", "note", "furniture", "noise"].map(String::from).to_vec();
    let four = LabelTaxonomy::new("four-class", classes, "paragraph", "note", "noise").unwrap();
    let rows = training_rows(&doc.lines, &r, &four).unwrap();
    assert_eq!(rows[2].label, "noise");
    assert_eq!(rows[2].label_id, 3);
}

#[test]
fn test_training_rows_reject_mismatched_lines() {
    let doc = document();
    let r = result(&doc, (0..5).map(|i| Assignment::original(i, 0.0)).collect());
    assert!(training_rows(&doc.lines[..3], &r, &LabelTaxonomy::default()).is_err());
}
