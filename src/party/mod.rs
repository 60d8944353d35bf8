//! Party roster: participants and the directed exclusion relation
//!
//! A participant's exclusion set is read from the giver's side only. Alice
//! excluding Bob means Alice may not draw Bob; Bob may still draw Alice.
//! Every participant implicitly excludes itself.

pub mod roster;

use crate::identity::{ParticipantId, PartyId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

pub use roster::{RosterEntry, RosterError, RosterFile};

/// Roster validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartyError {
    #[error("Party has no participants")]
    Empty,

    #[error("Participant {0} appears more than once")]
    DuplicateParticipant(ParticipantId),

    #[error("Participant {0} is not part of this party")]
    UnknownParticipant(ParticipantId),

    #[error("Participant {0} cannot exclude themselves")]
    SelfExclusion(ParticipantId),

    #[error("Participant '{name}' needs an id or an email address")]
    MissingIdentity { name: String },
}

/// A party member together with the recipients they must not draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub email: Option<String>,
    pub is_admin: bool,
    excluded: BTreeSet<ParticipantId>,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            is_admin: false,
            excluded: BTreeSet::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn as_admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    /// Builder form of [`Participant::exclude`].
    pub fn excluding(mut self, recipient: impl Into<ParticipantId>) -> Self {
        self.exclude(recipient.into());
        self
    }

    /// Add a recipient this participant must not draw.
    pub fn exclude(&mut self, recipient: ParticipantId) {
        self.excluded.insert(recipient);
    }

    /// Explicitly excluded recipients (self is not listed).
    pub fn excluded_participants(&self) -> &BTreeSet<ParticipantId> {
        &self.excluded
    }

    /// Whether this participant may not be assigned `recipient`.
    ///
    /// Always true for the participant itself.
    pub fn excludes(&self, recipient: &ParticipantId) -> bool {
        &self.id == recipient || self.excluded.contains(recipient)
    }
}

/// An ordered collection of participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    id: PartyId,
    name: Option<String>,
    participants: Vec<Participant>,
}

impl Party {
    pub fn new(id: PartyId) -> Self {
        Self {
            id,
            name: None,
            participants: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(&self) -> PartyId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// The party administrator, if one is flagged.
    pub fn admin(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_admin)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Append a participant.
    ///
    /// Rejects an id that is already present. Exclusions are not checked here
    /// since they may point at participants added later; see [`Party::validate`].
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), PartyError> {
        if self.participant(&participant.id).is_some() {
            return Err(PartyError::DuplicateParticipant(participant.id));
        }
        self.participants.push(participant);
        Ok(())
    }

    /// Forbid `giver` from drawing `recipient`.
    pub fn exclude(
        &mut self,
        giver: &ParticipantId,
        recipient: &ParticipantId,
    ) -> Result<(), PartyError> {
        if giver == recipient {
            return Err(PartyError::SelfExclusion(giver.clone()));
        }
        if self.participant(recipient).is_none() {
            return Err(PartyError::UnknownParticipant(recipient.clone()));
        }

        let participant = self
            .participants
            .iter_mut()
            .find(|p| &p.id == giver)
            .ok_or_else(|| PartyError::UnknownParticipant(giver.clone()))?;
        participant.exclude(recipient.clone());
        Ok(())
    }

    /// Check the roster is well formed.
    ///
    /// Exclusions may only name other members of the same party.
    pub fn validate(&self) -> Result<(), PartyError> {
        if self.participants.is_empty() {
            return Err(PartyError::Empty);
        }

        let mut seen = HashSet::new();
        for participant in &self.participants {
            if !seen.insert(&participant.id) {
                return Err(PartyError::DuplicateParticipant(participant.id.clone()));
            }
        }

        for participant in &self.participants {
            for excluded in &participant.excluded {
                if excluded == &participant.id {
                    return Err(PartyError::SelfExclusion(participant.id.clone()));
                }
                if !seen.contains(excluded) {
                    return Err(PartyError::UnknownParticipant(excluded.clone()));
                }
            }
        }

        Ok(())
    }
}
