//! # Antepool
//!
//! Timed multiplayer game rooms with entry-fee prize pools, free-for-all
//! score contests, and elimination tournaments.
//!
//! Participants join a room and pay an entry fee into a shared pool; when the
//! room's window closes (or its bracket crowns a champion), the winner
//! resolver ranks the field, the platform takes its fixed cut, and the prize
//! distribution engine pays the split and updates the leaderboards — exactly
//! once per room, guarded by conditional status transitions in the store.
//!
//! [`Engine`] is the single entry point for callers (UI, schedulers, admin
//! tooling); it composes the room, tournament, payout, and sweep layers over
//! any [`Store`] implementation.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use antepool::prelude::*;
//! use chrono::{Duration, Utc};
//!
//! # async fn demo() -> Result<(), antepool::EngineError> {
//! let engine = Engine::new(Arc::new(MemoryStore::new()));
//!
//! let now = Utc::now();
//! let config = RoomConfig::new(
//!     GameId(1),
//!     RoomKind::ScoreContest,
//!     now + Duration::minutes(5),
//!     now + Duration::minutes(65),
//! );
//! let room = engine.create_room(config).await?;
//! engine.join_room(room.id, UserId(1), now).await?;
//! engine.join_room(room.id, UserId(2), now).await?;
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;

pub use engine::{Engine, RoomStats};
pub use error::EngineError;

/// Everything a typical caller needs.
pub mod prelude {
    pub use antepool_room::{ReconcileOutcome, RoomConfig};
    pub use antepool_store::{MemoryStore, Store};
    pub use antepool_sweep::{SweepConfig, Sweeper};
    pub use antepool_tournament::{Bracket, BracketView, TournamentError};
    pub use antepool_types::{
        Amount, Currency, EliminationKind, GameId, MatchId, MatchStatus, RoomId, RoomKind,
        RoomStatus, SplitRule, TournamentConfig, UserId,
    };

    pub use crate::{Engine, EngineError, RoomStats};
}
