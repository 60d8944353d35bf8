//! Display layer for assignments and shuffle outcomes.
//!
//! User-facing output uses participant names, never raw ids. Unsatisfiable
//! outcomes are phrased for the party admin, who has to loosen exclusions or
//! grow the party before shuffling again.

use crate::identity::ParticipantId;
use crate::matchmaker::assignment::Assignment;
use crate::matchmaker::engine::{ShuffleOutcome, Unsatisfiable};
use crate::matchmaker::feasibility::ExclusionReport;
use crate::party::Party;
use std::collections::HashMap;

/// Density below which exclusions are considered light.
const SPARSE_DENSITY: f64 = 0.15;

/// Density at or above which random search is unlikely to succeed.
const DENSE_DENSITY: f64 = 0.5;

/// Build the id → name lookup for a party.
pub fn display_names(party: &Party) -> HashMap<ParticipantId, String> {
    party
        .participants()
        .iter()
        .map(|p| (p.id.clone(), p.name.clone()))
        .collect()
}

/// Resolve a participant id to its display name
///
/// Falls back to `@Unknown_<id>` for ids outside the lookup.
pub fn resolve_display_name(
    participant: &ParticipantId,
    display_names: &HashMap<ParticipantId, String>,
) -> String {
    display_names
        .get(participant)
        .cloned()
        .unwrap_or_else(|| format!("@Unknown_{}", participant))
}

/// Format each pairing as "Giver → Recipient", in party order.
pub fn format_assignment(assignment: &Assignment, party: &Party) -> Vec<String> {
    let names = display_names(party);
    assignment
        .iter()
        .map(|pairing| {
            format!(
                "🎁 {} → {}",
                resolve_display_name(&pairing.giver, &names),
                resolve_display_name(&pairing.recipient, &names)
            )
        })
        .collect()
}

/// Explain an unsatisfiable shuffle to the party admin.
pub fn format_unsatisfiable(reason: &Unsatisfiable, party: &Party) -> String {
    let names = display_names(party);
    match reason {
        Unsatisfiable::TooFewParticipants { count } => format!(
            "❌ Cannot shuffle: the party has {} participant(s). \
            Invite at least {} more before drawing names.",
            count,
            2usize.saturating_sub(*count)
        ),
        Unsatisfiable::NoEligibleRecipient(id) => format!(
            "❌ Cannot shuffle: {} has excluded everyone else. \
            Remove at least one of their exclusions.",
            resolve_display_name(id, &names)
        ),
        Unsatisfiable::NoEligibleGiver(id) => format!(
            "❌ Cannot shuffle: everyone else has excluded {}. \
            Remove at least one exclusion that targets them.",
            resolve_display_name(id, &names)
        ),
        Unsatisfiable::BudgetExhausted { attempts, elapsed } => format!(
            "❌ Cannot shuffle: no valid draw found after {} attempts ({:.1}s). \
            There are too many exclusions for a party of {}; remove some and try again.",
            attempts,
            elapsed.as_secs_f64(),
            party.len()
        ),
        Unsatisfiable::Cancelled { attempts } => format!(
            "⏹ Shuffle cancelled after {} attempts. Nothing was assigned.",
            attempts
        ),
    }
}

/// Render a shuffle outcome: a header plus one line per pairing, or the admin-facing reason.
pub fn format_outcome(outcome: &ShuffleOutcome, party: &Party) -> String {
    match outcome {
        ShuffleOutcome::Solved(assignment) => {
            let mut lines = vec![format!(
                "✅ Shuffled {} participants{}",
                assignment.len(),
                party
                    .name()
                    .map(|name| format!(" for \"{}\"", name))
                    .unwrap_or_default()
            )];
            lines.extend(format_assignment(assignment, party));
            lines.join("\n")
        }
        ShuffleOutcome::Unsatisfiable(reason) => format_unsatisfiable(reason, party),
    }
}

/// How tightly a party's exclusions constrain the draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintLevel {
    /// Few exclusions: a draw is found almost immediately
    Sparse,
    /// Noticeable exclusions: still expected to succeed
    Moderate,
    /// Most pairs excluded: the draw may fail
    Dense,
}

impl ConstraintLevel {
    pub fn from_density(density: f64) -> Self {
        if density < SPARSE_DENSITY {
            ConstraintLevel::Sparse
        } else if density < DENSE_DENSITY {
            ConstraintLevel::Moderate
        } else {
            ConstraintLevel::Dense
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ConstraintLevel::Sparse => "🟢",
            ConstraintLevel::Moderate => "🟡",
            ConstraintLevel::Dense => "🔴",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConstraintLevel::Sparse => "Sparse",
            ConstraintLevel::Moderate => "Moderate",
            ConstraintLevel::Dense => "Dense",
        }
    }
}

/// Render an exclusion report for the `check` command.
pub fn format_exclusion_report(report: &ExclusionReport, party: &Party) -> Vec<String> {
    let names = display_names(party);
    let level = ConstraintLevel::from_density(report.density);

    let mut lines = vec![format!(
        "{} Exclusions: {} ({} excluded pairs, {:.1}% of possible)",
        level.emoji(),
        level.description(),
        report.excluded_pairs,
        report.density * 100.0
    )];

    for constraints in &report.participants {
        lines.push(format!(
            "  {}: may draw {}, may be drawn by {}",
            resolve_display_name(&constraints.id, &names),
            constraints.eligible_recipients,
            constraints.eligible_givers
        ));
    }

    lines
}
