//! TOML roster files
//!
//! The CLI reads parties from a roster file:
//!
//! ```toml
//! name = "Office 2026"
//!
//! [[participants]]
//! name = "Alice"
//! email = "alice@example.com"
//! admin = true
//! excludes = ["bob@example.com"]
//!
//! [[participants]]
//! id = "bob"
//! name = "Bob"
//! email = "bob@example.com"
//! ```
//!
//! A participant without an explicit `id` gets one derived from its email.
//! Entries in `excludes` may name either an id or an email address.

use super::{Participant, Party, PartyError};
use crate::identity::{normalize_email, ParticipantId, PartyId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Errors loading a roster file
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Failed to read roster '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse roster '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// On-disk party description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterFile {
    /// Party id; a random one is generated when absent
    pub id: Option<Uuid>,

    pub name: Option<String>,

    #[serde(default)]
    pub participants: Vec<RosterEntry>,
}

/// One `[[participants]]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: Option<String>,

    pub name: String,

    pub email: Option<String>,

    #[serde(default)]
    pub admin: bool,

    /// Ids or emails of participants this one must not draw
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl RosterEntry {
    fn participant_id(&self) -> Result<ParticipantId, PartyError> {
        match (&self.id, &self.email) {
            (Some(id), _) => Ok(ParticipantId::new(id.trim())),
            (None, Some(email)) => Ok(ParticipantId::from_email(email)),
            (None, None) => Err(PartyError::MissingIdentity {
                name: self.name.clone(),
            }),
        }
    }
}

impl RosterFile {
    /// Load a roster from a TOML file.
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let contents = fs::read_to_string(path).map_err(|source| RosterError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| RosterError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Resolve identities and exclusions into a validated [`Party`].
    pub fn into_party(self) -> Result<Party, PartyError> {
        let id = self.id.map(PartyId::from_uuid).unwrap_or_else(PartyId::random);
        let mut party = Party::new(id);
        if let Some(name) = self.name {
            party = party.with_name(name);
        }

        // Exclusion references resolve against explicit ids first, then emails.
        let mut by_reference: HashMap<String, ParticipantId> = HashMap::new();
        let mut resolved = Vec::with_capacity(self.participants.len());

        for entry in &self.participants {
            let id = entry.participant_id()?;
            by_reference.insert(id.as_str().to_string(), id.clone());
            if let Some(email) = &entry.email {
                by_reference
                    .entry(normalize_email(email))
                    .or_insert_with(|| id.clone());
            }

            let mut participant = Participant::new(id.clone(), entry.name.clone());
            participant.email = entry.email.clone();
            participant.is_admin = entry.admin;
            party.add_participant(participant)?;
            resolved.push(id);
        }

        for (entry, giver) in self.participants.iter().zip(&resolved) {
            for reference in &entry.excludes {
                let recipient = by_reference
                    .get(reference.trim())
                    .or_else(|| by_reference.get(&normalize_email(reference)))
                    .cloned()
                    .ok_or_else(|| {
                        PartyError::UnknownParticipant(ParticipantId::new(reference.trim()))
                    })?;
                party.exclude(giver, &recipient)?;
            }
        }

        party.validate()?;
        Ok(party)
    }
}
