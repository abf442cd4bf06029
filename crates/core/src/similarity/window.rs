//! Locality-windowed best-match search.
//!
//! Extracted lines mostly follow reference order, so the match for the next
//! line is usually close to the previous one. The search scans
//! `[anchor - radius, anchor + radius]` first; while no candidate reaches the
//! floor it doubles the radius and scans only the newly covered positions,
//! until the whole sequence has been seen.
//!
//! Cost is `2 * radius + 1` scorer calls when the match is local and at most
//! one call per reference item otherwise.

use super::{PreparedText, ScoreMode, score_prepared};

/// The best candidate found by a windowed search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowMatch {
    pub index: usize,
    pub score: f64,
}

/// Outcome of one windowed search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSearch {
    /// Best candidate seen, even if it stayed below the floor.
    pub best: Option<WindowMatch>,
    /// Number of reference items scored.
    pub scanned: usize,
}

impl WindowSearch {
    /// The best candidate, only if it reaches `floor`.
    pub fn accepted(&self, floor: f64) -> Option<WindowMatch> {
        self.best.filter(|m| m.score >= floor)
    }
}

/// Windowed `partial_ratio` search with the line as needle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalitySearch {
    pub radius: usize,
    pub floor: f64,
}

impl LocalitySearch {
    pub fn new(radius: usize, floor: f64) -> Self {
        Self { radius, floor }
    }

    pub fn search(
        &self,
        needle: &PreparedText,
        references: &[PreparedText],
        anchor: usize,
    ) -> WindowSearch {
        let len = references.len();
        if len == 0 {
            return WindowSearch {
                best: None,
                scanned: 0,
            };
        }

        let anchor = anchor.min(len - 1);
        let mut best: Option<WindowMatch> = None;
        let mut scanned = 0;
        let mut consider = |index: usize, best: &mut Option<WindowMatch>| {
            let score = score_prepared(needle, &references[index], ScoreMode::PartialRatio);
            scanned += 1;
            let candidate = WindowMatch { index, score };
            if better(candidate, *best, anchor) {
                *best = Some(candidate);
            }
        };

        let mut radius = self.radius;
        let mut lo = anchor.saturating_sub(radius);
        let mut hi = (anchor + radius).min(len - 1);
        for index in lo..=hi {
            consider(index, &mut best);
        }

        while best.is_none_or(|m| m.score < self.floor) && (lo > 0 || hi < len - 1) {
            radius = radius.saturating_mul(2).max(1);
            let new_lo = anchor.saturating_sub(radius);
            let new_hi = anchor.saturating_add(radius).min(len - 1);
            for index in new_lo..lo {
                consider(index, &mut best);
            }
            for index in hi + 1..=new_hi {
                consider(index, &mut best);
            }
            lo = new_lo;
            hi = new_hi;
        }

        WindowSearch { best, scanned }
    }
}

/// Higher score wins, then proximity to the anchor, then the lower index.
fn better(candidate: WindowMatch, current: Option<WindowMatch>, anchor: usize) -> bool {
    let Some(current) = current else {
        return true;
    };
    if candidate.score != current.score {
        return candidate.score > current.score;
    }
    let cand_dist = candidate.index.abs_diff(anchor);
    let curr_dist = current.index.abs_diff(anchor);
    cand_dist < curr_dist || (cand_dist == curr_dist && candidate.index < current.index)
}
