//! Matchmaker: gift-exchange assignment engine
//!
//! Draws a giver → recipient assignment for a party such that nobody draws
//! themselves or anyone they excluded.
//! - Time-budgeted rejection sampling over random permutations
//! - Candidate-count pre-check for parties that can never be drawn
//! - Per-party memoization, safe under concurrent callers
//! - Name-based rendering for admins and participants

// Search
pub mod assignment;
pub mod cache;
pub mod engine;
pub mod feasibility;

// Presentation
pub mod display;

pub use assignment::{Assignment, AssignmentError, Pairing};
pub use cache::AssignmentCache;
pub use display::{format_assignment, format_outcome, resolve_display_name, ConstraintLevel};
pub use engine::{
    CancellationToken, ShuffleConfig, ShuffleEngine, ShuffleOutcome, Unsatisfiable,
    DEFAULT_TIME_BUDGET,
};
pub use feasibility::{Blocker, ExclusionMatrix, ExclusionReport};
