//! Error types for the tournament layer.

use antepool_payout::PayoutError;
use antepool_store::StoreError;
use antepool_types::{EliminationKind, MatchId, MatchStatus, RoomId, RoomStatus, UserId};

/// Errors that can occur during bracket generation and match operations.
#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    /// Too few participants for the chosen elimination type.
    #[error("{kind} elimination needs at least {required} participants, got {got}")]
    TooFewParticipants {
        kind: EliminationKind,
        required: usize,
        got: usize,
    },

    /// Single and double elimination require an even field.
    #[error("{0} elimination requires an even participant count")]
    OddParticipantCount(EliminationKind),

    /// Matches hold 2 or 4 players, nothing else.
    #[error("players per match must be 2 or 4, got {0}")]
    InvalidPlayersPerMatch(u32),

    /// Per-match time limit outside 5–120 minutes.
    #[error("match time limit must be between 5 and 120 minutes, got {0}")]
    TimeLimitOutOfRange(u32),

    /// Round duration outside 10–240 minutes.
    #[error("round duration must be between 10 and 240 minutes, got {0}")]
    RoundDurationOutOfRange(u32),

    /// The room is not a tournament room.
    #[error("room {0} is not a tournament room")]
    NotATournament(RoomId),

    /// Brackets are generated once the room is ongoing, not before or after.
    #[error("room {0} is {1}, bracket generation requires an ongoing room")]
    RoomNotOngoing(RoomId, RoomStatus),

    /// The room already has a bracket.
    #[error("room {0} already has a bracket")]
    BracketExists(RoomId),

    /// Tried to start a match that is not pending.
    #[error("match {0} is {1}, expected pending")]
    NotPending(MatchId, MatchStatus),

    /// Tried to resolve a match that is not active.
    #[error("match {0} is {1}, expected active")]
    NotActive(MatchId, MatchStatus),

    /// The match belongs to a round that has not become current yet.
    #[error("match {id} is in round {round}, room is at round {current}")]
    RoundNotCurrent {
        id: MatchId,
        round: u32,
        current: u32,
    },

    /// The match is still waiting on winners from its feeding matches.
    #[error("match {0} is waiting on feeder results")]
    SlotsUnfilled(MatchId),

    /// The named winner is not one of the match's players.
    #[error("user {1} is not playing in match {0}")]
    NotInMatch(MatchId, UserId),

    /// Timeout was requested before the match's time limit elapsed.
    #[error("match {0} has not exceeded its time limit")]
    TimeLimitNotElapsed(MatchId),

    /// The store rejected or failed an operation; conditional-transition
    /// conflicts (two callers racing the same match) surface here too.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Tournament finalization failed on its primary write path.
    #[error(transparent)]
    Payout(#[from] PayoutError),
}
