//! Step rewards shared by the global aligners.

use crate::config::AlignConfig;

/// How a line was matched to a reference item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Similarity at or above the confident threshold.
    Confident,
    /// Similarity in `[weak_match_floor, similarity_threshold)`.
    Weak,
}

/// Rewards for match, weak-match and gap steps, derived from an [`AlignConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardModel {
    pub confident_threshold: f64,
    pub weak_floor: f64,
    pub weak_penalty: f64,
    pub gap: f64,
}

impl RewardModel {
    pub fn new(config: &AlignConfig) -> Self {
        Self {
            confident_threshold: config.similarity_threshold,
            weak_floor: config.weak_match_floor,
            weak_penalty: config.weak_match_penalty.abs(),
            gap: config.gap_penalty,
        }
    }

    /// Reward for matching a line with similarity `similarity`, or `None`
    /// when the transition is disallowed.
    pub fn match_reward(&self, similarity: f64) -> Option<(MatchKind, f64)> {
        if similarity >= self.confident_threshold {
            Some((MatchKind::Confident, similarity))
        } else if similarity >= self.weak_floor {
            Some((MatchKind::Weak, similarity - self.weak_penalty))
        } else {
            None
        }
    }

    pub fn is_confident(&self, similarity: f64) -> bool {
        similarity >= self.confident_threshold
    }
}
