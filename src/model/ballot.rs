use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{candidate::CandidateId, slate::Slate};

/// A voter's proposed selections: one candidate per position.
///
/// Built up by the voting screen and validated against the voter's own
/// department slate on submission. Ballots are ephemeral; only their effect
/// on the tallies and the voter record is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    selections: BTreeMap<String, CandidateId>,
}

impl Ballot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a candidate for a position, replacing any previous choice.
    pub fn select(&mut self, position: impl Into<String>, candidate: CandidateId) {
        self.selections.insert(position.into(), candidate);
    }

    pub fn selection(&self, position: &str) -> Option<CandidateId> {
        self.selections.get(position).copied()
    }

    /// The selected candidate IDs, as mirrored into the voter record.
    pub fn candidate_ids(&self) -> BTreeSet<CandidateId> {
        self.selections.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Check this ballot against the slate it must answer.
    ///
    /// A valid ballot selects exactly one candidate per slate position, and
    /// every selected candidate genuinely stands for that position in that
    /// department. Selections for positions outside the slate are rejected
    /// rather than ignored, so a tampered ballot cannot smuggle votes into
    /// other departments. An empty slate makes the empty ballot valid.
    pub fn validate(&self, slate: &Slate) -> Result<()> {
        for group in slate.groups() {
            match self.selection(&group.position) {
                None => {
                    return Err(Error::Validation(format!(
                        "no selection for position {:?}",
                        group.position
                    )));
                }
                Some(id) if !group.candidates.iter().any(|c| c.id == id) => {
                    return Err(Error::Validation(format!(
                        "candidate {id} does not stand for {:?} in {}",
                        group.position,
                        slate.department()
                    )));
                }
                Some(_) => {}
            }
        }

        if self.selections.len() != slate.position_count() {
            return Err(Error::Validation(
                "ballot contains selections for unknown positions".to_string(),
            ));
        }

        Ok(())
    }
}
