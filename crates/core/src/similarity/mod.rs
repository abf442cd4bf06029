//! Text similarity primitives shared by every aligner.
//!
//! - `normalize` - text normalization applied before scoring
//! - `fuzz` - indel-based `ratio` and `partial_ratio` over char sequences
//! - `window` - locality-windowed best-match search over a reference sequence
//!
//! Everything here is pure and `Sync`; scorers can be called from any thread.

pub mod fuzz;
pub mod normalize;
pub mod window;

use serde::{Deserialize, Serialize};

pub use normalize::normalize;
pub use window::{LocalitySearch, WindowMatch, WindowSearch};

/// Which similarity measure to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    /// Whole-string similarity; symmetric.
    Ratio,
    /// First argument is the needle, scored against its best substring of
    /// the second argument; not symmetric.
    PartialRatio,
}

/// A string normalized once and kept as chars for repeated scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedText {
    chars: Vec<char>,
}

impl PreparedText {
    pub fn new(text: &str) -> Self {
        Self {
            chars: normalize(text).chars().collect(),
        }
    }

    /// Prepares every text of a sequence, preserving order.
    pub fn prepare_all<'a, I>(texts: I) -> Vec<PreparedText>
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts.into_iter().map(PreparedText::new).collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// Scores two already prepared texts.
pub fn score_prepared(a: &PreparedText, b: &PreparedText, mode: ScoreMode) -> f64 {
    match mode {
        ScoreMode::Ratio => fuzz::ratio(a.chars(), b.chars()),
        ScoreMode::PartialRatio => fuzz::partial_ratio(a.chars(), b.chars()),
    }
}

/// Normalizes both strings and scores them.
///
/// `score(a, a, mode) == 1.0` for any `a` that is non-empty after
/// normalization; `score("", "", mode) == 0.0`.
pub fn score(a: &str, b: &str, mode: ScoreMode) -> f64 {
    score_prepared(&PreparedText::new(a), &PreparedText::new(b), mode)
}
