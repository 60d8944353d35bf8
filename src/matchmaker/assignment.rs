//! Giver → recipient assignments.
//!
//! An [`Assignment`] can only be obtained through validation against its
//! party, so holding one means:
//! - every participant gives exactly once and receives exactly once
//! - nobody draws themselves
//! - nobody draws a participant they excluded

use crate::identity::ParticipantId;
use crate::party::Party;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Reasons a proposed mapping is not a valid assignment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    #[error("Expected {expected} pairings, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Participant {0} is not part of this party")]
    UnknownParticipant(ParticipantId),

    #[error("Participant {0} gives more than once")]
    DuplicateGiver(ParticipantId),

    #[error("Participant {0} receives more than once")]
    DuplicateRecipient(ParticipantId),

    #[error("Participant {0} would draw themselves")]
    SelfAssignment(ParticipantId),

    #[error("Participant {giver} excluded {recipient}")]
    ExcludedPair {
        giver: ParticipantId,
        recipient: ParticipantId,
    },
}

/// A single giver → recipient pairing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Pairing {
    pub giver: ParticipantId,
    pub recipient: ParticipantId,
}

/// A complete, validated assignment for one party
///
/// Pairings are kept in party order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pairings: Vec<Pairing>,
}

impl Assignment {
    /// Validate an externally supplied mapping against `party`.
    ///
    /// Useful for callers re-checking a persisted assignment after the roster
    /// or its exclusions changed. The result is reordered to party order.
    pub fn from_pairs<I>(party: &Party, pairs: I) -> Result<Self, AssignmentError>
    where
        I: IntoIterator<Item = (ParticipantId, ParticipantId)>,
    {
        let mut by_giver: HashMap<ParticipantId, ParticipantId> = HashMap::new();
        let mut recipients: HashSet<ParticipantId> = HashSet::new();

        for (giver, recipient) in pairs {
            let participant = party
                .participant(&giver)
                .ok_or_else(|| AssignmentError::UnknownParticipant(giver.clone()))?;
            if party.participant(&recipient).is_none() {
                return Err(AssignmentError::UnknownParticipant(recipient));
            }
            if giver == recipient {
                return Err(AssignmentError::SelfAssignment(giver));
            }
            if participant.excludes(&recipient) {
                return Err(AssignmentError::ExcludedPair { giver, recipient });
            }
            if !recipients.insert(recipient.clone()) {
                return Err(AssignmentError::DuplicateRecipient(recipient));
            }
            if by_giver.insert(giver.clone(), recipient).is_some() {
                return Err(AssignmentError::DuplicateGiver(giver));
            }
        }

        if by_giver.len() != party.len() {
            return Err(AssignmentError::LengthMismatch {
                expected: party.len(),
                actual: by_giver.len(),
            });
        }

        let pairings = party
            .participants()
            .iter()
            .map(|p| {
                by_giver
                    .remove(&p.id)
                    .map(|recipient| Pairing {
                        giver: p.id.clone(),
                        recipient,
                    })
                    .ok_or_else(|| AssignmentError::UnknownParticipant(p.id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { pairings })
    }

    /// Build from a permutation the caller has already checked.
    ///
    /// `permutation[i]` is the index of participant `i`'s recipient.
    pub(crate) fn from_checked_permutation(party: &Party, permutation: &[usize]) -> Self {
        let participants = party.participants();
        let pairings = participants
            .iter()
            .zip(permutation)
            .map(|(giver, &recipient)| Pairing {
                giver: giver.id.clone(),
                recipient: participants[recipient].id.clone(),
            })
            .collect();
        Self { pairings }
    }

    pub fn pairings(&self) -> &[Pairing] {
        &self.pairings
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pairing> {
        self.pairings.iter()
    }

    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    /// Who `giver` buys a gift for.
    pub fn recipient_of(&self, giver: &ParticipantId) -> Option<&ParticipantId> {
        self.pairings
            .iter()
            .find(|p| &p.giver == giver)
            .map(|p| &p.recipient)
    }

    /// Who buys a gift for `recipient`.
    pub fn giver_of(&self, recipient: &ParticipantId) -> Option<&ParticipantId> {
        self.pairings
            .iter()
            .find(|p| &p.recipient == recipient)
            .map(|p| &p.giver)
    }
}

impl<'a> IntoIterator for &'a Assignment {
    type Item = &'a Pairing;
    type IntoIter = std::slice::Iter<'a, Pairing>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairings.iter()
    }
}
