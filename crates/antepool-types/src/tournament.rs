//! Tournament match records and bracket configuration.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MatchId, RoomId, UserId};

/// Maximum player slots per match.
pub const MATCH_SLOTS: usize = 4;

// ---------------------------------------------------------------------------
// MatchStatus
// ---------------------------------------------------------------------------

/// The lifecycle of a single bracket match.
///
/// ```text
/// Pending → Active → Completed
///              └───→ Timeout
/// ```
///
/// Completed and Timeout both count as *resolved* for round-completion
/// purposes; a timed-out match still advances a winner via the tie-break
/// rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Active,
    Completed,
    Timeout,
}

impl MatchStatus {
    /// Resolved matches no longer block their round.
    pub fn is_resolved(self) -> bool {
        matches!(self, Self::Completed | Self::Timeout)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Timeout => "timeout",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// EliminationKind
// ---------------------------------------------------------------------------

/// Bracket structure variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationKind {
    Single,
    Double,
    Swiss,
}

impl fmt::Display for EliminationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Swiss => "swiss",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// TournamentConfig
// ---------------------------------------------------------------------------

/// Caller-supplied bracket settings, validated by the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub elimination: EliminationKind,
    /// Players per match: 2 (head-to-head) or 4 (four-way).
    pub players_per_match: u32,
    /// Per-match play window in minutes, 5–120.
    pub time_limit_minutes: u32,
    /// Scheduling hint for one round in minutes, 10–240.
    pub round_duration_minutes: u32,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        TournamentConfig {
            elimination: EliminationKind::Single,
            players_per_match: 2,
            time_limit_minutes: 15,
            round_duration_minutes: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// TournamentMatch
// ---------------------------------------------------------------------------

/// One match in a bracket.
///
/// Round-1 matches are created with concrete players; later rounds start with
/// empty slots and are filled with winner ids as their feeding matches
/// resolve. A *bye* is a single-occupant match created already completed —
/// its lone player advances unopposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentMatch {
    pub id: MatchId,
    pub room_id: RoomId,
    /// 1-based round number.
    pub round: u32,
    /// Strictly increasing across rounds in creation order, 1-based.
    pub match_number: u32,
    pub players: [Option<UserId>; MATCH_SLOTS],
    pub winner: Option<UserId>,
    pub status: MatchStatus,
    pub time_limit_minutes: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_bye: bool,
}

impl TournamentMatch {
    /// Occupied slots in slot order.
    pub fn occupants(&self) -> impl Iterator<Item = UserId> + '_ {
        self.players.iter().filter_map(|slot| *slot)
    }

    pub fn occupant_count(&self) -> usize {
        self.players.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn has_player(&self, user: UserId) -> bool {
        self.players.contains(&Some(user))
    }

    /// The highest-seeded occupant: lowest filled slot index. Used as the
    /// timeout tie-break winner.
    pub fn highest_seed(&self) -> Option<UserId> {
        self.occupants().next()
    }

    /// First empty slot index, if any.
    pub fn open_slot(&self) -> Option<usize> {
        self.players.iter().position(|slot| slot.is_none())
    }
}
