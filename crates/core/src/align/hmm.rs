//! HMM aligner decoded with Viterbi.
//!
//! Hidden states are Body, Footnote and Other. The emission for Body and
//! Footnote derives from the best locality-windowed `partial_ratio` of the
//! line against that reference sequence; the emission for Other derives from
//! the similarity threshold, so Other wins a line whose best match stays
//! below the threshold unless the transition priors say otherwise. Both go
//! through [`HmmParams::emission`] and are floored at [`MIN_EMISSION`].
//! Decoding runs in log space in `O(N * 9)` time.
//!
//! The reported `similarity_score` is the raw similarity behind the winning
//! state's emission (the threshold for Other).

use tracing::debug;

use crate::config::{AlignConfig, HMM_STATES, HmmParams};
use crate::error::Result;
use crate::model::{AlignmentResult, Assignment, Document, ReferenceClass, ReferenceId};
use crate::similarity::{LocalitySearch, WindowMatch};

use super::{AlgorithmId, Aligner, PreparedDocument, all_original, check_document, finish};

/// Emission probabilities are never allowed to reach zero.
pub const MIN_EMISSION: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HmmState {
    Body,
    Footnote,
    Other,
}

impl HmmState {
    pub const ALL: [HmmState; HMM_STATES] = [HmmState::Body, HmmState::Footnote, HmmState::Other];

    pub fn index(self) -> usize {
        match self {
            HmmState::Body => 0,
            HmmState::Footnote => 1,
            HmmState::Other => 2,
        }
    }
}

/// Decodes the most likely state path.
///
/// `emissions[t][s]` is the emission probability of observation `t` under
/// state `s` (index order Body, Footnote, Other). Ties go to the state that
/// comes first in that order.
pub fn viterbi(emissions: &[[f64; HMM_STATES]], params: &HmmParams) -> Vec<HmmState> {
    if emissions.is_empty() {
        return Vec::new();
    }

    let ln = |p: f64| p.max(MIN_EMISSION).ln();
    let log_trans: Vec<[f64; HMM_STATES]> = params
        .transitions
        .iter()
        .map(|row| row.map(ln))
        .collect();

    let mut delta: [f64; HMM_STATES] =
        std::array::from_fn(|s| ln(params.start[s]) + ln(emissions[0][s]));
    let mut back: Vec<[usize; HMM_STATES]> = Vec::with_capacity(emissions.len());
    back.push([0; HMM_STATES]);

    for emission in &emissions[1..] {
        let mut next = [f64::NEG_INFINITY; HMM_STATES];
        let mut from = [0usize; HMM_STATES];
        for s in 0..HMM_STATES {
            for p in 0..HMM_STATES {
                let cand = delta[p] + log_trans[p][s];
                if cand > next[s] {
                    next[s] = cand;
                    from[s] = p;
                }
            }
            next[s] += ln(emission[s]);
        }
        delta = next;
        back.push(from);
    }

    let mut state = 0;
    for s in 1..HMM_STATES {
        if delta[s] > delta[state] {
            state = s;
        }
    }

    let mut path = vec![HmmState::Body; emissions.len()];
    for t in (0..emissions.len()).rev() {
        path[t] = HmmState::ALL[state];
        state = back[t][state];
    }
    path
}

#[derive(Debug, Clone)]
pub struct HmmAligner {
    config: AlignConfig,
    params: HmmParams,
}

impl HmmAligner {
    pub fn new(config: AlignConfig, params: HmmParams) -> Result<Self> {
        config.validate()?;
        params.validate()?;
        Ok(Self { config, params })
    }

    pub fn params(&self) -> &HmmParams {
        &self.params
    }
}

impl Aligner for HmmAligner {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::HmmViterbi
    }

    fn config(&self) -> &AlignConfig {
        &self.config
    }

    fn align(&self, document: &Document) -> Result<AlignmentResult> {
        check_document(document)?;
        if document.references().is_empty() {
            return Ok(all_original(self.id(), self.config, document)?.with_hmm(self.params));
        }

        let prepared = PreparedDocument::new(document);
        let threshold = self.config.similarity_threshold;
        let other = self.params.emission(threshold);
        let search = LocalitySearch::new(self.config.locality_window, threshold);

        let mut cursors = [0usize; 2];
        let mut matches: Vec<[Option<WindowMatch>; 2]> = Vec::with_capacity(prepared.lines.len());
        let mut emissions = Vec::with_capacity(prepared.lines.len());

        for line in &prepared.lines {
            let found = ReferenceClass::ALL.map(|class| {
                let slot = class as usize;
                let best = search
                    .search(line, prepared.references(class), cursors[slot])
                    .best;
                if let Some(m) = best.filter(|m| m.score >= threshold) {
                    cursors[slot] = m.index;
                }
                best
            });
            let emission =
                |m: Option<WindowMatch>| self.params.emission(m.map_or(0.0, |m| m.score));
            emissions.push([emission(found[0]), emission(found[1]), other]);
            matches.push(found);
        }

        let path = viterbi(&emissions, &self.params);

        let assignments: Vec<Assignment> = path
            .iter()
            .enumerate()
            .map(|(i, state)| {
                let class = match state {
                    HmmState::Body => ReferenceClass::Body,
                    HmmState::Footnote => ReferenceClass::Footnote,
                    HmmState::Other => return Assignment::original(i, threshold),
                };
                match matches[i][class as usize] {
                    Some(m) => Assignment::matched(i, ReferenceId::new(class, m.index), m.score),
                    None => Assignment::original(i, 0.0),
                }
            })
            .collect();

        debug!(
            document = %document.id,
            lines = prepared.lines.len(),
            "hmm alignment complete"
        );
        Ok(finish(self.id(), self.config, assignments, document)?.with_hmm(self.params))
    }
}
