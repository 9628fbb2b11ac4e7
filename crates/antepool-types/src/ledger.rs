//! Payout ledger and leaderboard records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Amount, GameId, RoomId, UserId};

// ---------------------------------------------------------------------------
// WinnerRecord
// ---------------------------------------------------------------------------

/// One paid position in a completed room. Append-only; at most one row per
/// (room, position).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerRecord {
    pub room_id: RoomId,
    pub user_id: UserId,
    /// 1-based rank.
    pub position: u32,
    /// Percentage of the distributable pool this position was paid.
    pub prize_percentage: u8,
    pub prize_amount: Amount,
    pub recorded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

/// Aggregation window for leaderboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardPeriod {
    AllTime,
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for LeaderboardPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AllTime => "all_time",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

/// Leaderboard entries are keyed per user, per game scope, per period.
/// `game_id: None` is the global (all-games) scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaderboardKey {
    pub user_id: UserId,
    pub game_id: Option<GameId>,
    pub period: LeaderboardPeriod,
}

/// Running counters for one leaderboard key.
///
/// `total_score` is a running *maximum*, not a sum, and is tracked only on
/// per-game scopes. The remaining counters are monotonically increasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub key: LeaderboardKey,
    pub total_score: u64,
    pub games_played: u32,
    pub wins: u32,
    pub total_earnings: Amount,
}

impl LeaderboardEntry {
    pub fn new(key: LeaderboardKey) -> LeaderboardEntry {
        LeaderboardEntry {
            key,
            total_score: 0,
            games_played: 0,
            wins: 0,
            total_earnings: Amount::ZERO,
        }
    }
}
