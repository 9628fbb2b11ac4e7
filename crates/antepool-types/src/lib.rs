//! Shared data model for Antepool.
//!
//! Every identifier, money value, and record that crosses a crate boundary
//! lives here:
//!
//! - Identity newtypes ([`RoomId`], [`UserId`], [`MatchId`], [`GameId`])
//! - [`Amount`] — integer minor-unit money with exact percentage math
//! - [`SplitRule`] — named payout split policies
//! - [`Room`], [`Participant`] — room membership records
//! - [`TournamentMatch`], [`MatchStatus`] — bracket match records
//! - [`WinnerRecord`], [`LeaderboardEntry`] — payout and ranking ledgers

mod ids;
mod ledger;
mod money;
mod room;
mod split;
mod tournament;

pub use ids::{GameId, MatchId, RoomId, UserId};
pub use ledger::{LeaderboardEntry, LeaderboardKey, LeaderboardPeriod, WinnerRecord};
pub use money::{Amount, Currency};
pub use room::{Participant, Room, RoomKind, RoomStatus};
pub use split::SplitRule;
pub use tournament::{
    EliminationKind, MatchStatus, TournamentConfig, TournamentMatch, MATCH_SLOTS,
};
