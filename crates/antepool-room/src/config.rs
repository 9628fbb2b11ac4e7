//! Room creation configuration.

use antepool_types::{Amount, Currency, GameId, RoomKind, SplitRule};
use chrono::{DateTime, Utc};

use crate::RoomError;

/// Settings for a new room.
///
/// [`RoomConfig::new`] fills sensible defaults; override fields before
/// handing the config to [`RoomService::create_room`](crate::RoomService).
#[derive(Debug, Clone)]
pub struct RoomConfig {
    pub game_id: GameId,
    pub kind: RoomKind,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    /// Maximum players allowed. Default: 8.
    pub max_players: u32,
    /// Minimum players required at start_time, or the room auto-cancels.
    /// Default: 2.
    pub min_players_to_start: u32,

    /// Fee each participant pays into the pool on join.
    pub entry_fee: Amount,
    pub currency: Currency,
    pub winner_split_rule: SplitRule,

    /// Sponsored rooms seed the pool before anyone joins (entry fees still
    /// add on top, and may be zero).
    pub is_sponsored: bool,
    pub sponsor_seed: Amount,
}

impl RoomConfig {
    /// A config with defaults: 2–8 players, 10.00 entry fee, top-3 split.
    pub fn new(
        game_id: GameId,
        kind: RoomKind,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> RoomConfig {
        RoomConfig {
            game_id,
            kind,
            start_time,
            end_time,
            max_players: 8,
            min_players_to_start: 2,
            entry_fee: Amount::from_major(10),
            currency: Currency::usd(),
            winner_split_rule: SplitRule::Top3,
            is_sponsored: false,
            sponsor_seed: Amount::ZERO,
        }
    }

    /// Checks window ordering and player limits.
    pub fn validate(&self) -> Result<(), RoomError> {
        if self.start_time >= self.end_time {
            return Err(RoomError::InvalidWindow);
        }
        if self.min_players_to_start == 0 || self.min_players_to_start > self.max_players {
            return Err(RoomError::InvalidPlayerLimits {
                min: self.min_players_to_start,
                max: self.max_players,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap();
        (start, start + chrono::Duration::hours(1))
    }

    #[test]
    fn test_default_config_is_valid() {
        let (start, end) = window();
        let config = RoomConfig::new(GameId(1), RoomKind::ScoreContest, start, end);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_window_rejected() {
        let (start, end) = window();
        let config = RoomConfig::new(GameId(1), RoomKind::ScoreContest, end, start);
        assert!(matches!(config.validate(), Err(RoomError::InvalidWindow)));
    }

    #[test]
    fn test_min_above_max_rejected() {
        let (start, end) = window();
        let mut config = RoomConfig::new(GameId(1), RoomKind::ScoreContest, start, end);
        config.min_players_to_start = 9;
        assert!(matches!(
            config.validate(),
            Err(RoomError::InvalidPlayerLimits { min: 9, max: 8 })
        ));
    }

    #[test]
    fn test_zero_min_rejected() {
        let (start, end) = window();
        let mut config = RoomConfig::new(GameId(1), RoomKind::ScoreContest, start, end);
        config.min_players_to_start = 0;
        assert!(config.validate().is_err());
    }
}
