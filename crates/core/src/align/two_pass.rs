//! Two independent global alignments, reconciled per line.
//!
//! The full line sequence is aligned once against `body` alone and once
//! against `footnote` alone with a Needleman-Wunsch style table. Cells are
//! `(lines consumed, reference items opened)`; moves are
//! - open: match line `i` with item `j` and make it current,
//! - stay: match line `i` with the current item again,
//! - gap: leave line `i` unmatched (reward `gap_penalty`),
//! - skip: pass over item `j` without a line (free).
//!
//! Each pass costs `O(N * R)` similarity evaluations, for `O(N * (B + F))`
//! overall. The passes cannot exclude a span from one class because the
//! other class claimed it; reconciliation only compares their per-line
//! proposals.

use tracing::debug;

use crate::config::AlignConfig;
use crate::error::Result;
use crate::model::{AlignmentResult, Assignment, Document, ReferenceClass, ReferenceId};
use crate::similarity::{PreparedText, ScoreMode, score_prepared};

use super::reward::RewardModel;
use super::{AlgorithmId, Aligner, PreparedDocument, all_original, check_document, finish};

#[derive(Debug, Clone)]
pub struct TwoPassAligner {
    config: AlignConfig,
}

impl TwoPassAligner {
    pub fn new(config: AlignConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

/// One pass's proposal for a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassCandidate {
    pub index: usize,
    pub similarity: f64,
}

impl Aligner for TwoPassAligner {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::TwoPass
    }

    fn config(&self) -> &AlignConfig {
        &self.config
    }

    fn align(&self, document: &Document) -> Result<AlignmentResult> {
        check_document(document)?;
        if document.references().is_empty() {
            return all_original(self.id(), self.config, document);
        }

        let prepared = PreparedDocument::new(document);
        let reward = RewardModel::new(&self.config);
        let body = global_pass(&prepared.lines, &prepared.body, &reward);
        let footnote = global_pass(&prepared.lines, &prepared.footnote, &reward);

        let assignments: Vec<Assignment> = body
            .iter()
            .zip(&footnote)
            .enumerate()
            .map(|(i, (b, f))| reconcile(i, *b, *f, &reward))
            .collect();

        debug!(
            document = %document.id,
            lines = prepared.lines.len(),
            body = prepared.body.len(),
            footnote = prepared.footnote.len(),
            "two-pass alignment complete"
        );
        finish(self.id(), self.config, assignments, document)
    }
}

/// Accepts the confident proposal; when both are confident the higher one
/// wins and an exact tie goes to Body.
fn reconcile(
    line_index: usize,
    body: Option<PassCandidate>,
    footnote: Option<PassCandidate>,
    reward: &RewardModel,
) -> Assignment {
    let confident = |c: Option<PassCandidate>| c.filter(|c| reward.is_confident(c.similarity));
    match (confident(body), confident(footnote)) {
        (Some(b), Some(f)) if f.similarity > b.similarity => Assignment::matched(
            line_index,
            ReferenceId::new(ReferenceClass::Footnote, f.index),
            f.similarity,
        ),
        (Some(b), _) => Assignment::matched(
            line_index,
            ReferenceId::new(ReferenceClass::Body, b.index),
            b.similarity,
        ),
        (None, Some(f)) => Assignment::matched(
            line_index,
            ReferenceId::new(ReferenceClass::Footnote, f.index),
            f.similarity,
        ),
        (None, None) => {
            let best = [body, footnote]
                .into_iter()
                .flatten()
                .map(|c| c.similarity)
                .fold(0.0, f64::max);
            Assignment::original(line_index, best)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum Move {
    Origin,
    Gap,
    Stay,
    Open,
    Skip,
}

/// Globally aligns `lines` against one reference sequence and returns the
/// matched item (if any) per line.
pub fn global_pass(
    lines: &[PreparedText],
    references: &[PreparedText],
    reward: &RewardModel,
) -> Vec<Option<PassCandidate>> {
    let n = lines.len();
    let r = references.len();
    if r == 0 {
        return vec![None; n];
    }

    let width = r + 1;
    let mut moves = vec![Move::Origin; (n + 1) * width];
    for j in 1..=r {
        moves[j] = Move::Skip;
    }
    let mut prev = vec![0.0f64; width];
    let mut curr = vec![0.0f64; width];
    let mut sims = vec![0.0f64; r];

    for i in 0..n {
        for (j, sim) in sims.iter_mut().enumerate() {
            *sim = score_prepared(&lines[i], &references[j], ScoreMode::PartialRatio);
        }

        let row = (i + 1) * width;
        curr[0] = prev[0] + reward.gap;
        moves[row] = Move::Gap;

        for j in 1..=r {
            let mut best = (prev[j] + reward.gap, Move::Gap);
            if let Some((_, gain)) = reward.match_reward(sims[j - 1]) {
                if prev[j] + gain > best.0 {
                    best = (prev[j] + gain, Move::Stay);
                }
                if prev[j - 1] + gain > best.0 {
                    best = (prev[j - 1] + gain, Move::Open);
                }
            }
            if curr[j - 1] > best.0 {
                best = (curr[j - 1], Move::Skip);
            }
            curr[j] = best.0;
            moves[row + j] = best.1;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let mut out: Vec<Option<PassCandidate>> = vec![None; n];
    let (mut i, mut j) = (n, r);
    while i > 0 {
        match moves[i * width + j] {
            Move::Skip => j -= 1,
            Move::Gap => i -= 1,
            Move::Stay | Move::Open => {
                let mv = moves[i * width + j];
                out[i - 1] = Some(PassCandidate {
                    index: j - 1,
                    similarity: score_prepared(
                        &lines[i - 1],
                        &references[j - 1],
                        ScoreMode::PartialRatio,
                    ),
                });
                i -= 1;
                if mv == Move::Open {
                    j -= 1;
                }
            }
            Move::Origin => break,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> RewardModel {
        RewardModel {
            confident_threshold: 0.75,
            weak_floor: 0.5,
            weak_penalty: 0.4,
            gap: -0.3,
        }
    }

    fn cand(index: usize, similarity: f64) -> Option<PassCandidate> {
        Some(PassCandidate { index, similarity })
    }

    #[test]
    fn reconcile_prefers_higher_confident() {
        let a = reconcile(0, cand(1, 0.8), cand(2, 0.9), &model());
        assert_eq!(a.matched_reference, Some(ReferenceId::new(ReferenceClass::Footnote, 2)));
        let a = reconcile(0, cand(1, 0.95), cand(2, 0.9), &model());
        assert_eq!(a.matched_reference, Some(ReferenceId::new(ReferenceClass::Body, 1)));
    }

    #[test]
    fn reconcile_exact_tie_goes_to_body() {
        let a = reconcile(0, cand(1, 0.9), cand(2, 0.9), &model());
        assert_eq!(a.matched_reference, Some(ReferenceId::new(ReferenceClass::Body, 1)));
    }

    #[test]
    fn reconcile_ignores_weak_proposals() {
        let a = reconcile(3, cand(1, 0.6), cand(2, 0.8), &model());
        assert_eq!(a.matched_reference, Some(ReferenceId::new(ReferenceClass::Footnote, 2)));
        let a = reconcile(3, cand(1, 0.6), None, &model());
        assert_eq!(a, Assignment::original(3, 0.6));
    }

    #[test]
    fn multi_line_paragraph_stays_on_item() {
        let lines = PreparedText::prepare_all([
            "the quick brown fox",
            "jumps over the lazy dog",
            "a second paragraph",
        ]);
        let refs = PreparedText::prepare_all([
            "the quick brown fox jumps over the lazy dog",
            "a second paragraph follows here",
        ]);
        let out = global_pass(&lines, &refs, &model());
        let indices: Vec<_> = out.iter().map(|c| c.map(|c| c.index)).collect();
        assert_eq!(indices, vec![Some(0), Some(0), Some(1)]);
    }
}
