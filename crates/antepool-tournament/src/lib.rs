//! Bracket generation and match lifecycle for Antepool tournaments.
//!
//! [`generate_bracket`] builds the full round ladder up front: round 1 with
//! concrete (shuffled) players, later rounds as empty-slot placeholders that
//! are filled with winner ids as their feeding matches resolve.
//! [`TournamentService`] drives matches through pending → active →
//! completed/timeout, advances rounds once every match in the current round
//! is resolved, and hands the finished tournament to the payout crate.
//!
//! Randomness is injected (`impl Rng`) so tests can seed the shuffle;
//! production callers pass `rand::rng()`.

mod bracket;
mod error;
mod matches;

pub use bracket::{generate_bracket, Bracket};
pub use error::TournamentError;
pub use matches::{BracketView, RoundView, TournamentService};
