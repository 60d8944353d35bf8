//! Exclusion graph analysis.
//!
//! The roster is turned into a dense index matrix once per search so that
//! checking a candidate permutation is a handful of array lookups.
//!
//! [`ExclusionReport`] summarises how constrained a party is. Its blocker
//! check is only a necessary condition: a party where every giver has some
//! eligible recipient and every recipient some eligible giver can still be
//! unsatisfiable (e.g. A↛B and B↛A among three people). Those cases are left
//! to the time-budgeted search.

use crate::identity::ParticipantId;
use crate::party::Party;
use std::collections::HashMap;

/// Dense giver × recipient "forbidden" matrix in party order.
///
/// The diagonal is always forbidden.
#[derive(Debug, Clone)]
pub struct ExclusionMatrix {
    size: usize,
    forbidden: Vec<bool>,
}

impl ExclusionMatrix {
    pub fn from_party(party: &Party) -> Self {
        let participants = party.participants();
        let size = participants.len();
        let index: HashMap<&ParticipantId, usize> = participants
            .iter()
            .enumerate()
            .map(|(i, p)| (&p.id, i))
            .collect();

        let mut forbidden = vec![false; size * size];
        for (giver, participant) in participants.iter().enumerate() {
            forbidden[giver * size + giver] = true;
            // Dangling references are ignored here; Party::validate reports them.
            for excluded in participant.excluded_participants() {
                if let Some(&recipient) = index.get(excluded) {
                    forbidden[giver * size + recipient] = true;
                }
            }
        }

        Self { size, forbidden }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether participant `giver` may draw participant `recipient` (by index).
    pub fn allows(&self, giver: usize, recipient: usize) -> bool {
        !self.forbidden[giver * self.size + recipient]
    }

    /// Whether `permutation` (giver index → recipient index) respects every exclusion.
    pub fn admits(&self, permutation: &[usize]) -> bool {
        permutation.len() == self.size
            && permutation
                .iter()
                .enumerate()
                .all(|(giver, &recipient)| self.allows(giver, recipient))
    }

    pub fn eligible_recipients(&self, giver: usize) -> usize {
        (0..self.size).filter(|&r| self.allows(giver, r)).count()
    }

    pub fn eligible_givers(&self, recipient: usize) -> usize {
        (0..self.size).filter(|&g| self.allows(g, recipient)).count()
    }

    /// Number of forbidden ordered pairs, excluding the diagonal.
    pub fn excluded_pairs(&self) -> usize {
        self.forbidden.iter().filter(|&&f| f).count() - self.size
    }
}

/// Why a party cannot possibly be shuffled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocker {
    /// This participant excluded everyone else
    NoEligibleRecipient(ParticipantId),
    /// Everyone else excluded this participant
    NoEligibleGiver(ParticipantId),
}

/// Per-participant candidate counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantConstraints {
    pub id: ParticipantId,
    pub eligible_recipients: usize,
    pub eligible_givers: usize,
}

/// Constraint summary for a party
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusionReport {
    pub participants: Vec<ParticipantConstraints>,
    pub excluded_pairs: usize,
    /// Excluded ordered pairs over all n·(n-1) non-self pairs (0.0 to 1.0)
    pub density: f64,
}

impl ExclusionReport {
    pub fn analyze(party: &Party) -> Self {
        Self::from_matrix(party, &ExclusionMatrix::from_party(party))
    }

    pub(crate) fn from_matrix(party: &Party, matrix: &ExclusionMatrix) -> Self {
        let participants = party
            .participants()
            .iter()
            .enumerate()
            .map(|(i, p)| ParticipantConstraints {
                id: p.id.clone(),
                eligible_recipients: matrix.eligible_recipients(i),
                eligible_givers: matrix.eligible_givers(i),
            })
            .collect();

        let size = matrix.size();
        let excluded_pairs = matrix.excluded_pairs();
        let density = if size < 2 {
            0.0
        } else {
            excluded_pairs as f64 / (size * (size - 1)) as f64
        };

        Self {
            participants,
            excluded_pairs,
            density,
        }
    }

    /// First participant that makes any assignment impossible, if one exists.
    ///
    /// Givers are checked before recipients, both in party order.
    pub fn first_blocker(&self) -> Option<Blocker> {
        if let Some(p) = self.participants.iter().find(|p| p.eligible_recipients == 0) {
            return Some(Blocker::NoEligibleRecipient(p.id.clone()));
        }
        self.participants
            .iter()
            .find(|p| p.eligible_givers == 0)
            .map(|p| Blocker::NoEligibleGiver(p.id.clone()))
    }

    /// Most constrained participant as a giver (fewest eligible recipients).
    pub fn tightest_giver(&self) -> Option<&ParticipantConstraints> {
        self.participants.iter().min_by_key(|p| p.eligible_recipients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::PartyId;
    use crate::party::Participant;

    fn pid(token: &str) -> ParticipantId {
        ParticipantId::new(token)
    }

    fn party(entries: Vec<(&str, Vec<&str>)>) -> Party {
        let mut party = Party::new(PartyId::random());
        for (id, excludes) in entries {
            let mut participant = Participant::new(id, id.to_uppercase());
            for excluded in excludes {
                participant.exclude(pid(excluded));
            }
            party.add_participant(participant).unwrap();
        }
        party
    }

    #[test]
    fn test_diagonal_always_forbidden() {
        let party = party(vec![("a", vec![]), ("b", vec![])]);
        let matrix = ExclusionMatrix::from_party(&party);

        assert!(!matrix.allows(0, 0));
        assert!(!matrix.allows(1, 1));
        assert!(matrix.allows(0, 1));
        assert!(matrix.admits(&[1, 0]));
        assert!(!matrix.admits(&[0, 1]));
        assert_eq!(matrix.excluded_pairs(), 0);
    }

    #[test]
    fn test_directed_exclusion() {
        let party = party(vec![("a", vec!["b"]), ("b", vec![]), ("c", vec![])]);
        let matrix = ExclusionMatrix::from_party(&party);

        assert!(!matrix.allows(0, 1));
        assert!(matrix.allows(1, 0));
        assert_eq!(matrix.eligible_recipients(0), 1);
        assert_eq!(matrix.eligible_givers(1), 1);
        assert_eq!(matrix.excluded_pairs(), 1);
    }

    #[test]
    fn test_wrong_length_permutation_not_admitted() {
        let party = party(vec![("a", vec![]), ("b", vec![]), ("c", vec![])]);
        let matrix = ExclusionMatrix::from_party(&party);
        assert!(!matrix.admits(&[1, 0]));
    }

    #[test]
    fn test_blocker_no_eligible_recipient() {
        let party = party(vec![("a", vec!["b", "c"]), ("b", vec![]), ("c", vec![])]);
        let report = ExclusionReport::analyze(&party);

        assert_eq!(report.first_blocker(), Some(Blocker::NoEligibleRecipient(pid("a"))));
        assert_eq!(report.tightest_giver().map(|p| p.id.clone()), Some(pid("a")));
    }

    #[test]
    fn test_blocker_no_eligible_giver() {
        let party = party(vec![("a", vec!["c"]), ("b", vec!["c"]), ("c", vec![])]);
        let report = ExclusionReport::analyze(&party);

        assert_eq!(report.first_blocker(), Some(Blocker::NoEligibleGiver(pid("c"))));
    }

    #[test]
    fn test_pairwise_cycle_passes_precheck() {
        // Unsatisfiable, but not detectable by candidate counts alone
        let party = party(vec![("a", vec!["b"]), ("b", vec!["a"]), ("c", vec![])]);
        let report = ExclusionReport::analyze(&party);
        assert_eq!(report.first_blocker(), None);
    }

    #[test]
    fn test_density() {
        let party = party(vec![("a", vec!["b", "c"]), ("b", vec!["a", "c"]), ("c", vec!["a", "b"])]);
        let report = ExclusionReport::analyze(&party);
        assert_eq!(report.excluded_pairs, 6);
        assert!((report.density - 1.0).abs() < f64::EPSILON);

        let single = ExclusionReport::analyze(&self::party(vec![("solo", vec![])]));
        assert_eq!(single.density, 0.0);
        assert_eq!(
            single.first_blocker(),
            Some(Blocker::NoEligibleRecipient(pid("solo")))
        );
    }
}
