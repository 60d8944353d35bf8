//! Per-party memoization of solved assignments.
//!
//! Keyed by [`PartyId`], not by roster content: a second shuffle of the same
//! party returns the first result even if its exclusions changed since. Call
//! [`AssignmentCache::remove`] when a roster edit should invalidate it.
//!
//! ## Locking
//!
//! Each party owns a slot with its own mutex. A search runs while holding its
//! party's slot, so concurrent callers for that party wait and then observe
//! the stored value instead of searching again. The outer map lock is only
//! held long enough to look up or create a slot, so different parties never
//! wait on each other's searches.
//!
//! A slot only ever holds `None` or a complete assignment, so a poisoned lock
//! (a panicking solver) is recovered rather than propagated.

use crate::identity::PartyId;
use crate::matchmaker::assignment::Assignment;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Slot = Arc<Mutex<Option<Assignment>>>;

/// Shared assignment cache
///
/// Cloning shares the underlying storage.
#[derive(Debug, Clone, Default)]
pub struct AssignmentCache {
    slots: Arc<Mutex<HashMap<PartyId, Slot>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AssignmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, party: PartyId) -> Slot {
        lock(&self.slots).entry(party).or_default().clone()
    }

    fn existing_slot(&self, party: &PartyId) -> Option<Slot> {
        lock(&self.slots).get(party).cloned()
    }

    /// Stored assignment for `party`.
    ///
    /// Waits for an in-flight search on the same party to finish.
    pub fn get(&self, party: &PartyId) -> Option<Assignment> {
        let slot = self.existing_slot(party)?;
        let guard = lock(&slot);
        guard.clone()
    }

    /// Return the stored assignment, or run `solve` and store its success.
    ///
    /// At most one `solve` runs per party at a time. Failures are returned
    /// without being stored, so a later call searches again. A failed party
    /// keeps no slot unless another caller is already waiting on it.
    pub fn get_or_try_solve<F, E>(&self, party: PartyId, solve: F) -> Result<Assignment, E>
    where
        F: FnOnce() -> Result<Assignment, E>,
    {
        let slot = self.slot(party);
        let mut guard = lock(&slot);

        if let Some(assignment) = guard.as_ref() {
            return Ok(assignment.clone());
        }

        match solve() {
            Ok(assignment) => {
                *guard = Some(assignment.clone());
                Ok(assignment)
            }
            Err(e) => {
                self.release_empty_slot(party, &slot);
                Err(e)
            }
        }
    }

    // Called with the slot locked. Slot handles are only cloned under the map
    // lock, so a count of two (map + ours) means nobody else is waiting.
    fn release_empty_slot(&self, party: PartyId, slot: &Slot) {
        let mut slots = lock(&self.slots);
        let unshared = slots
            .get(&party)
            .is_some_and(|stored| Arc::ptr_eq(stored, slot) && Arc::strong_count(slot) == 2);
        if unshared {
            slots.remove(&party);
        }
    }

    /// Store `assignment` for `party`, replacing any previous value.
    pub fn insert(&self, party: PartyId, assignment: Assignment) {
        let slot = self.slot(party);
        *lock(&slot) = Some(assignment);
    }

    /// Forget the assignment for `party`.
    ///
    /// If a search for this party is running, waits for it to finish and
    /// returns its result. The next call starts fresh.
    pub fn remove(&self, party: &PartyId) -> Option<Assignment> {
        let slot = lock(&self.slots).remove(party)?;
        let mut guard = lock(&slot);
        guard.take()
    }

    /// Number of parties with a stored assignment.
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = lock(&self.slots).values().cloned().collect();
        slots.iter().filter(|slot| lock(slot).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.slots).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::party::{Participant, Party};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn solved_pair() -> (Party, Assignment) {
        let mut party = Party::new(PartyId::random());
        party.add_participant(Participant::new("a", "A")).unwrap();
        party.add_participant(Participant::new("b", "B")).unwrap();
        let assignment = Assignment::from_checked_permutation(&party, &[1, 0]);
        (party, assignment)
    }

    #[test]
    fn test_get_or_try_solve_caches_success() {
        let cache = AssignmentCache::new();
        let (party, assignment) = solved_pair();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let result: Result<_, ()> = cache.get_or_try_solve(party.id(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(assignment.clone())
            });
            assert_eq!(result.unwrap(), assignment);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failures_not_cached() {
        let cache = AssignmentCache::new();
        let party = PartyId::random();

        let first: Result<Assignment, &str> = cache.get_or_try_solve(party, || Err("nope"));
        assert_eq!(first.unwrap_err(), "nope");
        assert!(cache.get(&party).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failed_parties_leave_no_slots() {
        let cache = AssignmentCache::new();

        for _ in 0..100 {
            let result: Result<Assignment, ()> = cache.get_or_try_solve(PartyId::random(), || Err(()));
            assert!(result.is_err());
        }

        assert!(lock(&cache.slots).is_empty());
    }

    #[test]
    fn test_waiter_after_failure_still_memoizes() {
        let cache = AssignmentCache::new();
        let (party, assignment) = solved_pair();
        let id = party.id();

        let first = {
            let cache = cache.clone();
            thread::spawn(move || {
                let result: Result<Assignment, ()> = cache.get_or_try_solve(id, || {
                    thread::sleep(Duration::from_millis(100));
                    Err(())
                });
                result
            })
        };
        thread::sleep(Duration::from_millis(20));

        let second: Result<_, ()> = cache.get_or_try_solve(id, || Ok(assignment.clone()));
        assert!(first.join().unwrap().is_err());
        assert_eq!(second.unwrap(), assignment);
        assert_eq!(cache.get(&id), Some(assignment));
    }

    #[test]
    fn test_remove_waits_for_running_search() {
        let cache = AssignmentCache::new();
        let (party, assignment) = solved_pair();
        let id = party.id();

        let solver = {
            let cache = cache.clone();
            let assignment = assignment.clone();
            thread::spawn(move || {
                let result: Result<_, ()> = cache.get_or_try_solve(id, || {
                    thread::sleep(Duration::from_millis(100));
                    Ok(assignment)
                });
                result
            })
        };
        thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.remove(&id), Some(assignment));
        assert!(solver.join().unwrap().is_ok());
        assert!(cache.get(&id).is_none());
    }

    #[test]
    fn test_insert_remove_clear() {
        let cache = AssignmentCache::new();
        let (party, assignment) = solved_pair();

        cache.insert(party.id(), assignment.clone());
        assert_eq!(cache.get(&party.id()), Some(assignment.clone()));

        assert_eq!(cache.remove(&party.id()), Some(assignment.clone()));
        assert!(cache.get(&party.id()).is_none());
        assert!(cache.remove(&party.id()).is_none());

        cache.insert(party.id(), assignment);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_callers_share_one_search() {
        let cache = AssignmentCache::new();
        let (party, assignment) = solved_pair();
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let calls = calls.clone();
                let assignment = assignment.clone();
                let id = party.id();
                thread::spawn(move || {
                    let result: Result<_, ()> = cache.get_or_try_solve(id, || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(20));
                        Ok(assignment)
                    });
                    result.unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), assignment);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_poisoned_slot_recovers() {
        let cache = AssignmentCache::new();
        let (party, assignment) = solved_pair();
        let id = party.id();

        let panicking = cache.clone();
        let _ = thread::spawn(move || {
            let _: Result<Assignment, ()> =
                panicking.get_or_try_solve(id, || panic!("solver crashed"));
        })
        .join();

        let result: Result<_, ()> = cache.get_or_try_solve(id, || Ok(assignment.clone()));
        assert_eq!(result.unwrap(), assignment);
    }
}
