//! Greedy locality-windowed aligner.
//!
//! Each line is matched on its own: the best `partial_ratio` candidate in
//! each reference sequence is searched near that sequence's last confident
//! match, and the better of the two is accepted if it clears the threshold.
//! Several lines may match the same reference item.

use tracing::debug;

use crate::config::AlignConfig;
use crate::error::Result;
use crate::model::{AlignmentResult, Assignment, Document, ReferenceClass, ReferenceId};
use crate::similarity::{LocalitySearch, WindowMatch};

use super::{AlgorithmId, Aligner, PreparedDocument, all_original, check_document, finish};

#[derive(Debug, Clone)]
pub struct BaselineAligner {
    config: AlignConfig,
}

impl BaselineAligner {
    pub fn new(config: AlignConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Aligner for BaselineAligner {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::Baseline
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
        let threshold = self.config.similarity_threshold;
        let search = LocalitySearch::new(self.config.locality_window, threshold);

        let mut body_cursor = 0;
        let mut footnote_cursor = 0;
        let mut previous: Option<ReferenceClass> = None;
        let mut scanned = 0;
        let mut assignments = Vec::with_capacity(prepared.lines.len());

        for (i, line) in prepared.lines.iter().enumerate() {
            let body = search.search(line, &prepared.body, body_cursor);
            let footnote = search.search(line, &prepared.footnote, footnote_cursor);
            scanned += body.scanned + footnote.scanned;

            match pick(body.best, footnote.best, previous) {
                Some((class, m)) if m.score >= threshold => {
                    match class {
                        ReferenceClass::Body => body_cursor = m.index,
                        ReferenceClass::Footnote => footnote_cursor = m.index,
                    }
                    previous = Some(class);
                    assignments.push(Assignment::matched(
                        i,
                        ReferenceId::new(class, m.index),
                        m.score,
                    ));
                }
                best => {
                    previous = None;
                    assignments.push(Assignment::original(i, best.map_or(0.0, |(_, m)| m.score)));
                }
            }
        }

        debug!(
            document = %document.id,
            lines = prepared.lines.len(),
            scanned,
            "baseline alignment complete"
        );
        finish(self.id(), self.config, assignments, document)
    }
}

/// Picks the higher-scoring class; an exact tie continues the previous
/// line's class and otherwise falls back to Body.
fn pick(
    body: Option<WindowMatch>,
    footnote: Option<WindowMatch>,
    previous: Option<ReferenceClass>,
) -> Option<(ReferenceClass, WindowMatch)> {
    match (body, footnote) {
        (None, None) => None,
        (Some(b), None) => Some((ReferenceClass::Body, b)),
        (None, Some(f)) => Some((ReferenceClass::Footnote, f)),
        (Some(b), Some(f)) => {
            if b.score > f.score {
                Some((ReferenceClass::Body, b))
            } else if f.score > b.score {
                Some((ReferenceClass::Footnote, f))
            } else if previous == Some(ReferenceClass::Footnote) {
                Some((ReferenceClass::Footnote, f))
            } else {
                Some((ReferenceClass::Body, b))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(index: usize, score: f64) -> Option<WindowMatch> {
        Some(WindowMatch { index, score })
    }

    #[test]
    fn tie_continues_previous_class() {
        let picked = pick(m(0, 0.9), m(3, 0.9), Some(ReferenceClass::Footnote));
        assert_eq!(picked.map(|(c, _)| c), Some(ReferenceClass::Footnote));
    }

    #[test]
    fn tie_defaults_to_body() {
        assert_eq!(
            pick(m(0, 0.9), m(3, 0.9), None).map(|(c, _)| c),
            Some(ReferenceClass::Body)
        );
        assert_eq!(
            pick(m(0, 0.9), m(3, 0.9), Some(ReferenceClass::Body)).map(|(c, _)| c),
            Some(ReferenceClass::Body)
        );
    }

    #[test]
    fn higher_score_wins() {
        assert_eq!(
            pick(m(0, 0.7), m(1, 0.8), Some(ReferenceClass::Body)).map(|(c, _)| c),
            Some(ReferenceClass::Footnote)
        );
    }
}
