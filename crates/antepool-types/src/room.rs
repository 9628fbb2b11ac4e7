//! Room and participant records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Amount, Currency, GameId, RoomId, SplitRule, UserId};

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// The lifecycle status of a room.
///
/// Transitions are monotonic:
///
/// ```text
/// Waiting → Ongoing → Finalizing → Completed
///    └──(cancel, pre-start only)──→ Cancelled
/// ```
///
/// - **Waiting**: Room exists, accepting joins. Start time not reached.
/// - **Ongoing**: Start time passed with enough players; scores (or matches)
///   are being played.
/// - **Finalizing**: Transient guard state — exactly one finalizer holds it
///   while prize distribution runs. Never observable as a rest state in a
///   healthy system.
/// - **Completed**: Prizes distributed (or the window closed with nothing to
///   distribute). Terminal.
/// - **Cancelled**: Cancelled while waiting, entry fees refunded. Terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Waiting,
    Ongoing,
    Finalizing,
    Completed,
    Cancelled,
}

impl RoomStatus {
    /// Returns `true` once no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns `true` if the room is accepting new participants.
    pub fn is_joinable(self) -> bool {
        matches!(self, Self::Waiting)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Waiting => "waiting",
            Self::Ongoing => "ongoing",
            Self::Finalizing => "finalizing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// RoomKind
// ---------------------------------------------------------------------------

/// How a room decides its ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    /// Free-for-all: participants submit scores during the ongoing window.
    ScoreContest,
    /// Elimination bracket: scores accrue from match wins.
    Tournament,
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// One contest or tournament instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Which mini-game this room plays (scopes the leaderboard).
    pub game_id: GameId,
    pub kind: RoomKind,
    pub status: RoomStatus,

    /// Scheduled window. `actual_*` record when transitions really happened.
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,

    pub max_players: u32,
    pub min_players_to_start: u32,
    pub current_players: u32,

    pub entry_fee: Amount,
    pub currency: Currency,
    /// Entry fees plus any sponsor seed. Shrinks only on refunds.
    pub total_prize_pool: Amount,
    pub platform_fee_collected: Amount,
    pub winner_split_rule: SplitRule,
    pub is_sponsored: bool,

    /// Tournament bookkeeping; both zero for score contests and for
    /// tournament rooms whose bracket has not been generated yet.
    pub current_round: u32,
    pub tournament_rounds: u32,
}

impl Room {
    pub fn is_full(&self) -> bool {
        self.current_players >= self.max_players
    }

    pub fn is_tournament(&self) -> bool {
        self.kind == RoomKind::Tournament
    }

    /// Whether the bracket for this tournament room has been generated.
    pub fn has_bracket(&self) -> bool {
        self.tournament_rounds > 0
    }
}

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// A user's membership in one room.
///
/// At most one *active* participant row exists per (room, user) pair. A user
/// who leaves while the room is waiting is soft-removed (`is_active` cleared)
/// rather than deleted, keeping the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub room_id: RoomId,
    pub user_id: UserId,
    /// `None` until a score is submitted (contest) or a match is won
    /// (tournament).
    pub score: Option<u64>,
    /// 1-based rank, set once by prize distribution. `None` for non-winners.
    pub final_position: Option<u32>,
    /// Zero until distribution.
    pub earnings: Amount,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(room_id: RoomId, user_id: UserId, joined_at: DateTime<Utc>) -> Participant {
        Participant {
            room_id,
            user_id,
            score: None,
            final_position: None,
            earnings: Amount::ZERO,
            is_active: true,
            joined_at,
        }
    }

    /// The score used for ranking; unsubmitted counts as zero.
    pub fn effective_score(&self) -> u64 {
        self.score.unwrap_or(0)
    }
}
