//! santa-shuffle - Gift Exchange Assignment Engine
//!
//! Draws Secret Santa assignments for a party: every participant gives to
//! exactly one other participant and receives from exactly one, never
//! drawing themselves or anyone they excluded.
//!
//! Key principles:
//! - Pure in-memory computation (no I/O in the engine)
//! - Wall-clock time budget instead of an attempt limit
//! - "Unsatisfiable" is a normal outcome, never a partial assignment
//! - Results memoized per party id
//!
//! ```no_run
//! use santa_shuffle::identity::PartyId;
//! use santa_shuffle::matchmaker::{ShuffleEngine, ShuffleOutcome};
//! use santa_shuffle::party::{Participant, Party};
//!
//! let mut party = Party::new(PartyId::random());
//! party.add_participant(Participant::new("alice", "Alice").excluding("bob")).unwrap();
//! party.add_participant(Participant::new("bob", "Bob")).unwrap();
//! party.add_participant(Participant::new("carol", "Carol")).unwrap();
//!
//! match ShuffleEngine::default().shuffle(&party) {
//!     ShuffleOutcome::Solved(assignment) => println!("{:?}", assignment),
//!     ShuffleOutcome::Unsatisfiable(reason) => eprintln!("{}", reason),
//! }
//! ```

pub mod identity;
pub mod matchmaker;
pub mod party;
