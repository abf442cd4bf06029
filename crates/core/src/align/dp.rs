//! Banded joint DP over (line, body, footnote) positions.
//!
//! A state `(b, f)` after `i` lines means `b` body items and `f` footnote
//! items have been opened; the current body item is `b - 1`. From row `i`
//! to row `i + 1` line `i` either
//! - matches body item `b - 1`, staying on it (`(b, f)` to `(b, f)`) or opening
//!   it (any `(b0, f0)` with `b0 < b`, `f0 <= f`);
//! - matches footnote item `f - 1` the same way;
//! - takes a gap, reward `gap_penalty`, optionally skipping unopened items.
//!
//! Matches are allowed at confident similarity (reward = similarity) or in
//! the weak band (reward = similarity - |weak_match_penalty|).
//!
//! Skipping reference items is free, so each row keeps a 2D prefix maximum
//! and every transition costs O(1). Row `i` only keeps states within
//! `band_width` of the proportional positions `i * B / N` and `i * F / N`,
//! so time and memory are `O(N * (2w + 1)^2)` regardless of `B` and `F`.

use tracing::debug;

use crate::config::AlignConfig;
use crate::error::{AlignError, Result};
use crate::model::{AlignmentResult, Assignment, Document, ReferenceClass, ReferenceId};
use crate::similarity::{PreparedText, ScoreMode, score_prepared};

use super::reward::RewardModel;
use super::{AlgorithmId, Aligner, PreparedDocument, all_original, check_document, finish};

#[derive(Debug, Clone)]
pub struct DpAligner {
    config: AlignConfig,
}

impl DpAligner {
    pub fn new(config: AlignConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Aligner for DpAligner {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::DpTwoSequence
    }

    fn config(&self) -> &AlignConfig {
        &self.config
    }

    fn align(&self, document: &Document) -> Result<AlignmentResult> {
        check_document(document)?;
        if document.references().is_empty() || document.lines.is_empty() {
            return all_original(self.id(), self.config, document);
        }

        let prepared = PreparedDocument::new(document);
        let assignments = BandedDp::new(&prepared, &self.config).run()?;
        finish(self.id(), self.config, assignments, document)
    }
}

/// Rectangle of kept `(b, f)` states for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Band {
    b_lo: usize,
    b_hi: usize,
    f_lo: usize,
    f_hi: usize,
}

impl Band {
    fn around(row: usize, rows: usize, body_len: usize, footnote_len: usize, width: usize) -> Self {
        let (b_lo, b_hi) = axis(row, rows, body_len, width);
        let (f_lo, f_hi) = axis(row, rows, footnote_len, width);
        Self {
            b_lo,
            b_hi,
            f_lo,
            f_hi,
        }
    }

    fn cols(&self) -> usize {
        self.f_hi - self.f_lo + 1
    }

    fn cells(&self) -> usize {
        (self.b_hi - self.b_lo + 1) * self.cols()
    }

    fn contains(&self, b: usize, f: usize) -> bool {
        (self.b_lo..=self.b_hi).contains(&b) && (self.f_lo..=self.f_hi).contains(&f)
    }

    fn idx(&self, b: usize, f: usize) -> usize {
        (b - self.b_lo) * self.cols() + (f - self.f_lo)
    }

    fn states(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.b_lo..=self.b_hi).flat_map(move |b| (self.f_lo..=self.f_hi).map(move |f| (b, f)))
    }
}

/// Band limits along one reference axis of length `len`.
fn axis(row: usize, rows: usize, len: usize, width: usize) -> (usize, usize) {
    let center = if rows == 0 {
        0
    } else {
        ((row as u64 * len as u64 + rows as u64 / 2) / rows as u64) as usize
    };
    (
        center.saturating_sub(width),
        center.saturating_add(width).min(len),
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Gap,
    Match(ReferenceClass),
}

#[derive(Debug, Clone, Copy)]
struct Back {
    prev_b: u32,
    prev_f: u32,
    step: Step,
    score: f64,
}

impl Default for Back {
    fn default() -> Self {
        Self {
            prev_b: 0,
            prev_f: 0,
            step: Step::Gap,
            score: 0.0,
        }
    }
}

/// One DP row plus its prefix maximum.
struct Row {
    band: Band,
    value: Vec<f64>,
    /// Best `(value, b, f)` over all kept states `<= (b, f)` componentwise.
    prefix: Vec<(f64, usize, usize)>,
}

impl Row {
    fn new(band: Band, value: Vec<f64>) -> Self {
        let mut prefix = vec![(f64::NEG_INFINITY, 0, 0); band.cells()];
        for (b, f) in band.states() {
            let idx = band.idx(b, f);
            let mut best = (value[idx], b, f);
            if b > band.b_lo {
                let up = prefix[band.idx(b - 1, f)];
                if up.0 > best.0 {
                    best = up;
                }
            }
            if f > band.f_lo {
                let left = prefix[band.idx(b, f - 1)];
                if left.0 > best.0 {
                    best = left;
                }
            }
            prefix[idx] = best;
        }
        Self {
            band,
            value,
            prefix,
        }
    }

    fn value_at(&self, b: usize, f: usize) -> f64 {
        if self.band.contains(b, f) {
            self.value[self.band.idx(b, f)]
        } else {
            f64::NEG_INFINITY
        }
    }

    fn prefix_at(&self, b: usize, f: usize) -> Option<(f64, usize, usize)> {
        if b < self.band.b_lo || f < self.band.f_lo {
            return None;
        }
        let b = b.min(self.band.b_hi);
        let f = f.min(self.band.f_hi);
        Some(self.prefix[self.band.idx(b, f)])
    }
}

/// Similarities of one line against a contiguous run of reference items.
struct SimSpan {
    start: usize,
    scores: Vec<f64>,
}

impl SimSpan {
    /// Scores items `b - 1` for every state `b` in `[lo, hi]` with `b >= 1`.
    fn compute(line: &PreparedText, references: &[PreparedText], lo: usize, hi: usize) -> Self {
        let start = lo.max(1) - 1;
        let end = hi.min(references.len());
        let scores = (start..end)
            .map(|k| score_prepared(line, &references[k], ScoreMode::PartialRatio))
            .collect();
        Self { start, scores }
    }

    fn get(&self, item: usize) -> f64 {
        item.checked_sub(self.start)
            .and_then(|k| self.scores.get(k))
            .copied()
            .unwrap_or(0.0)
    }
}

struct BandedDp<'a> {
    prepared: &'a PreparedDocument,
    reward: RewardModel,
    width: usize,
}

impl<'a> BandedDp<'a> {
    fn new(prepared: &'a PreparedDocument, config: &AlignConfig) -> Self {
        Self {
            prepared,
            reward: RewardModel::new(config),
            width: config.band_width,
        }
    }

    fn band(&self, row: usize) -> Band {
        Band::around(
            row,
            self.prepared.lines.len(),
            self.prepared.body.len(),
            self.prepared.footnote.len(),
            self.width,
        )
    }

    fn run(&self) -> Result<Vec<Assignment>> {
        let n = self.prepared.lines.len();
        let band0 = self.band(0);
        let mut initial = vec![f64::NEG_INFINITY; band0.cells()];
        initial[band0.idx(0, 0)] = 0.0;
        let mut row = Row::new(band0, initial);

        let mut history: Vec<(Band, Vec<Back>)> = Vec::with_capacity(n);
        let mut cells = 0usize;

        for (i, line) in self.prepared.lines.iter().enumerate() {
            let band = self.band(i + 1);
            cells += band.cells();
            let body = SimSpan::compute(line, &self.prepared.body, band.b_lo, band.b_hi);
            let footnote =
                SimSpan::compute(line, &self.prepared.footnote, band.f_lo, band.f_hi);

            let mut values = vec![f64::NEG_INFINITY; band.cells()];
            let mut backs = vec![Back::default(); band.cells()];

            for (b, f) in band.states() {
                let (value, back) = self.best_transition(&row, b, f, &body, &footnote);
                let idx = band.idx(b, f);
                values[idx] = value;
                backs[idx] = back;
            }

            history.push((band, backs));
            row = Row::new(band, values);
        }

        let (mut b, mut f, total) = row
            .band
            .states()
            .map(|(b, f)| (b, f, row.value_at(b, f)))
            .fold((0, 0, f64::NEG_INFINITY), |best, cand| {
                if cand.2 > best.2 { cand } else { best }
            });
        if !total.is_finite() {
            return Err(AlignError::InconsistentResult(
                "banded DP found no feasible path".to_string(),
            ));
        }

        let mut assignments = Vec::with_capacity(n);
        for i in (0..n).rev() {
            let (band, backs) = &history[i];
            let back = backs[band.idx(b, f)];
            assignments.push(match back.step {
                Step::Gap => Assignment::original(i, 0.0),
                Step::Match(ReferenceClass::Body) => Assignment::matched(
                    i,
                    ReferenceId::new(ReferenceClass::Body, b - 1),
                    back.score,
                ),
                Step::Match(ReferenceClass::Footnote) => Assignment::matched(
                    i,
                    ReferenceId::new(ReferenceClass::Footnote, f - 1),
                    back.score,
                ),
            });
            b = back.prev_b as usize;
            f = back.prev_f as usize;
        }
        assignments.reverse();

        debug!(lines = n, cells, total, "banded DP alignment complete");
        Ok(assignments)
    }

    /// Best way to reach `(b, f)` on the next row. Ties keep the gap, then
    /// body before footnote, then staying before opening a new item.
    fn best_transition(
        &self,
        row: &Row,
        b: usize,
        f: usize,
        body: &SimSpan,
        footnote: &SimSpan,
    ) -> (f64, Back) {
        let mut best = (f64::NEG_INFINITY, Back::default());
        let mut offer = |value: f64, prev: (usize, usize), step: Step, score: f64| {
            if value > best.0 {
                best = (
                    value,
                    Back {
                        prev_b: prev.0 as u32,
                        prev_f: prev.1 as u32,
                        step,
                        score,
                    },
                );
            }
        };

        if let Some((v, pb, pf)) = row.prefix_at(b, f) {
            offer(v + self.reward.gap, (pb, pf), Step::Gap, 0.0);
        }

        for class in ReferenceClass::ALL {
            let (pos, span) = match class {
                ReferenceClass::Body => (b, body),
                ReferenceClass::Footnote => (f, footnote),
            };
            if pos == 0 {
                continue;
            }
            let similarity = span.get(pos - 1);
            let Some((_, reward)) = self.reward.match_reward(similarity) else {
                continue;
            };

            offer(row.value_at(b, f) + reward, (b, f), Step::Match(class), similarity);

            let opened = match class {
                ReferenceClass::Body => row.prefix_at(b - 1, f),
                ReferenceClass::Footnote => row.prefix_at(b, f - 1),
            };
            if let Some((v, pb, pf)) = opened {
                offer(v + reward, (pb, pf), Step::Match(class), similarity);
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_is_clipped_and_proportional() {
        assert_eq!(axis(0, 10, 5, 2), (0, 2));
        assert_eq!(axis(10, 10, 5, 2), (3, 5));
        assert_eq!(axis(5, 10, 0, 3), (0, 0));
        assert_eq!(axis(4, 8, 100, 5), (45, 55));
    }

    #[test]
    fn prefix_clamps_above_and_rejects_below() {
        let band = Band {
            b_lo: 1,
            b_hi: 2,
            f_lo: 0,
            f_hi: 1,
        };
        let row = Row::new(band, vec![0.5, 0.1, -1.0, 0.7]);
        assert_eq!(row.prefix_at(0, 1), None);
        assert_eq!(row.prefix_at(5, 5), Some((0.7, 2, 1)));
        assert_eq!(row.prefix_at(2, 0), Some((0.5, 1, 0)));
        assert_eq!(row.value_at(3, 0), f64::NEG_INFINITY);
    }
}
