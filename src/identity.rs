//! Participant and party identities
//!
//! The engine only needs identities that compare for equality. Participants
//! are keyed by an opaque string token; when a roster only carries an email
//! address the token is derived from it, so the same person gets the same id
//! across roster edits.
//!
//! Parties are keyed by a UUID. That id is what the assignment cache uses,
//! never the roster content.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Number of digest bytes kept for email-derived ids (16 hex chars).
const EMAIL_ID_BYTES: usize = 8;

/// Opaque participant identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create from an explicit token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Derive an id from an email address.
    ///
    /// The address is trimmed and lowercased before hashing, so
    /// `" Alice@Example.com"` and `"alice@example.com"` map to the same id.
    pub fn from_email(email: &str) -> Self {
        let normalized = normalize_email(email);
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        let digest = hasher.finalize();
        Self(hex::encode(&digest[..EMAIL_ID_BYTES]))
    }

    /// Get the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for ParticipantId {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Stable party identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(Uuid);

impl PartyId {
    /// Generate a fresh random party id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_email_id_is_normalized() {
        let a = ParticipantId::from_email("alice@example.com");
        let b = ParticipantId::from_email("  Alice@Example.COM ");
        assert_eq!(a, b);
    }

    #[test]
    fn test_email_id_length() {
        let id = ParticipantId::from_email("bob@example.com");
        assert_eq!(id.as_str().len(), EMAIL_ID_BYTES * 2);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_distinct_emails_distinct_ids() {
        let a = ParticipantId::from_email("alice@example.com");
        let b = ParticipantId::from_email("bob@example.com");
        assert_ne!(a, b);
    }

    #[test]
    fn test_party_ids_are_unique() {
        assert_ne!(PartyId::random(), PartyId::random());
    }

    #[test]
    fn test_party_id_serde_transparent() {
        let uuid = Uuid::new_v4();
        let id = PartyId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }

    proptest! {
        #[test]
        fn prop_email_id_deterministic(local in "[a-z]{1,12}", domain in "[a-z]{1,8}") {
            let email = format!("{}@{}.org", local, domain);
            prop_assert_eq!(
                ParticipantId::from_email(&email),
                ParticipantId::from_email(&email.to_uppercase())
            );
        }
    }
}
