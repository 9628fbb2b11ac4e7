//! Winner resolution and prize distribution.
//!
//! Two pieces, deliberately separated:
//!
//! - [`resolve_winners`] is a pure function from participant scores and a
//!   split rule to a ranked winner list. No I/O, fully unit-testable.
//! - [`distribute_prizes`] consumes that list behind the room's
//!   ongoing→finalizing guard: it takes the platform fee, pays each ranked
//!   position its percentage of the remainder, appends winner-ledger rows,
//!   and bumps leaderboards. Exactly-once per room — the loser of the guard
//!   race observes [`DistributionOutcome::AlreadyHandled`] and changes
//!   nothing.

mod distribute;
mod error;
mod resolve;

pub use distribute::{distribute_prizes, DistributionOutcome, PLATFORM_FEE_PERCENT};
pub use error::PayoutError;
pub use resolve::{resolve_winners, RankedWinner};
