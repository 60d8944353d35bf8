//! Time-budgeted random assignment search.
//!
//! ## Algorithm
//!
//! Rejection sampling over uniformly random permutations:
//! 1. Shuffle a fresh copy of the participant indices (Fisher-Yates)
//! 2. Zip party order against the shuffled order
//! 3. Accept if nobody drew themselves or someone they excluded
//! 4. Otherwise repeat until the wall-clock budget runs out
//!
//! The loop is bounded by time, not attempts, so worst-case latency does not
//! depend on party size or exclusion density. Exhausting the budget means the
//! exclusions are too dense for this party; retrying with the same roster has
//! the same expected outcome.
//!
//! Parties that fail the candidate-count check in
//! [`feasibility`](crate::matchmaker::feasibility) are rejected before any
//! sampling.

use crate::identity::ParticipantId;
use crate::matchmaker::assignment::Assignment;
use crate::matchmaker::cache::AssignmentCache;
use crate::matchmaker::feasibility::{Blocker, ExclusionMatrix, ExclusionReport};
use crate::party::Party;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default wall-clock budget for one search.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(10);

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleConfig {
    /// Wall-clock budget for one search
    pub time_budget: Duration,

    /// Return the first solved assignment for a party on later calls
    pub memoize: bool,
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        Self {
            time_budget: DEFAULT_TIME_BUDGET,
            memoize: true,
        }
    }
}

impl ShuffleConfig {
    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }
}

/// Why no assignment was produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unsatisfiable {
    #[error("A party needs at least two participants to shuffle (has {count})")]
    TooFewParticipants { count: usize },

    #[error("Participant {0} has excluded every possible recipient")]
    NoEligibleRecipient(ParticipantId),

    #[error("Participant {0} has been excluded by every possible giver")]
    NoEligibleGiver(ParticipantId),

    #[error("No valid assignment found in {attempts} attempts ({elapsed:?})")]
    BudgetExhausted { attempts: u64, elapsed: Duration },

    #[error("Shuffle cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },
}

impl From<Blocker> for Unsatisfiable {
    fn from(blocker: Blocker) -> Self {
        match blocker {
            Blocker::NoEligibleRecipient(id) => Unsatisfiable::NoEligibleRecipient(id),
            Blocker::NoEligibleGiver(id) => Unsatisfiable::NoEligibleGiver(id),
        }
    }
}

/// Result of a shuffle request
///
/// `Unsatisfiable` is an expected business outcome ("too many exclusions for
/// this party"), not a fault. There is no partial result.
#[must_use = "an unsatisfiable shuffle must be reported to the party admin"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShuffleOutcome {
    Solved(Assignment),
    Unsatisfiable(Unsatisfiable),
}

impl ShuffleOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, ShuffleOutcome::Solved(_))
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            ShuffleOutcome::Solved(assignment) => Some(assignment),
            ShuffleOutcome::Unsatisfiable(_) => None,
        }
    }

    /// Convert for callers that propagate with `?`.
    pub fn into_result(self) -> Result<Assignment, Unsatisfiable> {
        match self {
            ShuffleOutcome::Solved(assignment) => Ok(assignment),
            ShuffleOutcome::Unsatisfiable(reason) => Err(reason),
        }
    }
}

impl From<Result<Assignment, Unsatisfiable>> for ShuffleOutcome {
    fn from(result: Result<Assignment, Unsatisfiable>) -> Self {
        match result {
            Ok(assignment) => ShuffleOutcome::Solved(assignment),
            Err(reason) => ShuffleOutcome::Unsatisfiable(reason),
        }
    }
}

/// Cooperative cancellation flag, checked between attempts
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Assignment engine
///
/// Stateless across parties apart from the memoization cache. Safe to share
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct ShuffleEngine {
    config: ShuffleConfig,
    cache: AssignmentCache,
}

impl ShuffleEngine {
    pub fn new(config: ShuffleConfig) -> Self {
        Self {
            config,
            cache: AssignmentCache::new(),
        }
    }

    /// Share an existing cache (e.g. one owned by the caller's workflow).
    pub fn with_cache(config: ShuffleConfig, cache: AssignmentCache) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &ShuffleConfig {
        &self.config
    }

    pub fn cache(&self) -> &AssignmentCache {
        &self.cache
    }

    /// Shuffle using the thread-local RNG.
    ///
    /// With memoization on, a party that was already solved returns its first
    /// assignment without looking at the roster again. Call
    /// [`ShuffleEngine::forget`] after adding participants or exclusions.
    pub fn shuffle(&self, party: &Party) -> ShuffleOutcome {
        self.shuffle_with_rng(party, &mut rand::thread_rng())
    }

    /// Shuffle with a caller-supplied RNG (seeded runs, tests).
    pub fn shuffle_with_rng<R: Rng + ?Sized>(&self, party: &Party, rng: &mut R) -> ShuffleOutcome {
        self.shuffle_cancellable(party, rng, &CancellationToken::new())
    }

    /// Shuffle, stopping early if `cancel` is triggered.
    pub fn shuffle_cancellable<R: Rng + ?Sized>(
        &self,
        party: &Party,
        rng: &mut R,
        cancel: &CancellationToken,
    ) -> ShuffleOutcome {
        if party.len() < 2 {
            let reason = Unsatisfiable::TooFewParticipants { count: party.len() };
            warn!(party = %party.id(), %reason, "shuffle unsatisfiable");
            return ShuffleOutcome::Unsatisfiable(reason);
        }

        if !self.config.memoize {
            return self.search(party, rng, cancel).into();
        }

        let mut searched = false;
        let result = self.cache.get_or_try_solve(party.id(), || {
            searched = true;
            self.search(party, rng, cancel)
        });
        if !searched {
            debug!(party = %party.id(), "returning memoized assignment");
        }
        result.into()
    }

    /// Drop the memoized assignment for `party`, forcing the next shuffle to search.
    pub fn forget(&self, party: &Party) -> Option<Assignment> {
        self.cache.remove(&party.id())
    }

    fn search<R: Rng + ?Sized>(
        &self,
        party: &Party,
        rng: &mut R,
        cancel: &CancellationToken,
    ) -> Result<Assignment, Unsatisfiable> {
        let matrix = ExclusionMatrix::from_party(party);
        if let Some(blocker) = ExclusionReport::from_matrix(party, &matrix).first_blocker() {
            let reason = Unsatisfiable::from(blocker);
            warn!(party = %party.id(), %reason, "shuffle unsatisfiable");
            return Err(reason);
        }

        debug!(
            party = %party.id(),
            participants = party.len(),
            budget_ms = self.config.time_budget.as_millis() as u64,
            "starting shuffle search"
        );

        let started = Instant::now();
        // A budget too large to represent as an Instant never expires.
        let deadline = started.checked_add(self.config.time_budget);
        let order: Vec<usize> = (0..party.len()).collect();
        let mut attempts: u64 = 0;

        while deadline.map_or(true, |deadline| Instant::now() < deadline) {
            if cancel.is_cancelled() {
                let reason = Unsatisfiable::Cancelled { attempts };
                warn!(party = %party.id(), %reason, "shuffle cancelled");
                return Err(reason);
            }

            attempts += 1;
            let mut candidate = order.clone();
            candidate.shuffle(rng);

            if matrix.admits(&candidate) {
                info!(
                    party = %party.id(),
                    attempts,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "shuffle solved"
                );
                return Ok(Assignment::from_checked_permutation(party, &candidate));
            }
        }

        let reason = Unsatisfiable::BudgetExhausted {
            attempts,
            elapsed: started.elapsed(),
        };
        warn!(party = %party.id(), %reason, "shuffle unsatisfiable");
        Err(reason)
    }
}
