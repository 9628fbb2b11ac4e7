//! The engine facade: one object tying the room, tournament, payout, and
//! sweep layers together over a store.

use std::sync::Arc;

use antepool_room::{ReconcileOutcome, RoomConfig, RoomService};
use antepool_store::Store;
use antepool_sweep::{SweepConfig, Sweeper};
use antepool_tournament::{Bracket, BracketView, TournamentService};
use antepool_types::{
    Amount, MatchId, Participant, Room, RoomId, RoomKind, RoomStatus, SplitRule, TournamentConfig,
    TournamentMatch, UserId, WinnerRecord,
};
use chrono::{DateTime, Utc};
use rand::Rng;

use crate::EngineError;

/// A point-in-time summary of one room, for dashboards and admin tooling.
#[derive(Debug, Clone)]
pub struct RoomStats {
    pub room_id: RoomId,
    pub kind: RoomKind,
    pub status: RoomStatus,
    pub current_players: u32,
    pub max_players: u32,
    pub entry_fee: Amount,
    pub total_prize_pool: Amount,
    pub platform_fee_collected: Amount,
    pub winner_split_rule: SplitRule,
    pub current_round: u32,
    pub tournament_rounds: u32,
    /// Paid positions, in position order; empty until the room completes.
    pub winners: Vec<WinnerRecord>,
}

/// The caller-facing engine.
///
/// Cheap to share: clone the `Arc`s it hands out or wrap the whole engine in
/// one. Every time-dependent operation takes an explicit `now`, so callers
/// (and tests) own the clock; the [`Sweeper`] from [`Engine::sweeper`] feeds
/// it wall time on an interval.
pub struct Engine<S> {
    store: Arc<S>,
    rooms: Arc<RoomService<S>>,
    tournaments: Arc<TournamentService<S>>,
}

impl<S: Store> Engine<S> {
    pub fn new(store: Arc<S>) -> Engine<S> {
        Engine {
            rooms: Arc::new(RoomService::new(store.clone())),
            tournaments: Arc::new(TournamentService::new(store.clone())),
            store,
        }
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    // -- Rooms --

    pub async fn create_room(&self, config: RoomConfig) -> Result<Room, EngineError> {
        Ok(self.rooms.create_room(config).await?)
    }

    pub async fn join_room(
        &self,
        room: RoomId,
        user: UserId,
        now: DateTime<Utc>,
    ) -> Result<Participant, EngineError> {
        Ok(self.rooms.join(room, user, now).await?)
    }

    pub async fn leave_room(
        &self,
        room: RoomId,
        user: UserId,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        Ok(self.rooms.leave(room, user, now).await?)
    }

    pub async fn submit_score(
        &self,
        room: RoomId,
        user: UserId,
        score: u64,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        Ok(self.rooms.submit_score(room, user, score, now).await?)
    }

    pub async fn cancel_room(&self, room: RoomId, now: DateTime<Utc>) -> Result<Room, EngineError> {
        Ok(self.rooms.cancel(room, now).await?)
    }

    /// Idempotent time-driven check; see
    /// [`RoomService::reconcile`](antepool_room::RoomService::reconcile).
    pub async fn reconcile(
        &self,
        room: RoomId,
        now: DateTime<Utc>,
    ) -> Result<ReconcileOutcome, EngineError> {
        Ok(self.rooms.reconcile(room, now).await?)
    }

    // -- Tournaments --

    /// Generates the bracket with a uniform shuffle.
    pub async fn create_tournament(
        &self,
        room: RoomId,
        config: &TournamentConfig,
        now: DateTime<Utc>,
    ) -> Result<Bracket, EngineError> {
        self.create_tournament_with_rng(room, config, now, &mut rand::rng()).await
    }

    /// Same as [`create_tournament`](Self::create_tournament), with an
    /// injected RNG for deterministic pairings in tests.
    pub async fn create_tournament_with_rng<R: Rng>(
        &self,
        room: RoomId,
        config: &TournamentConfig,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Bracket, EngineError> {
        Ok(self.tournaments.create_tournament(room, config, now, rng).await?)
    }

    pub async fn start_match(
        &self,
        id: MatchId,
        now: DateTime<Utc>,
    ) -> Result<TournamentMatch, EngineError> {
        Ok(self.tournaments.start_match(id, now).await?)
    }

    pub async fn complete_match(
        &self,
        id: MatchId,
        winner: UserId,
        now: DateTime<Utc>,
    ) -> Result<TournamentMatch, EngineError> {
        Ok(self.tournaments.complete_match(id, winner, now).await?)
    }

    pub async fn timeout_match(
        &self,
        id: MatchId,
        now: DateTime<Utc>,
    ) -> Result<TournamentMatch, EngineError> {
        Ok(self.tournaments.timeout_match(id, now).await?)
    }

    pub async fn get_bracket(&self, room: RoomId) -> Result<BracketView, EngineError> {
        Ok(self.tournaments.bracket(room).await?)
    }

    // -- Stats --

    pub async fn get_stats(&self, room: RoomId) -> Result<RoomStats, EngineError> {
        let stored = self.store.get_room(room).await?;
        let winners = self.store.list_winner_records(room).await?;
        Ok(RoomStats {
            room_id: stored.id,
            kind: stored.kind,
            status: stored.status,
            current_players: stored.current_players,
            max_players: stored.max_players,
            entry_fee: stored.entry_fee,
            total_prize_pool: stored.total_prize_pool,
            platform_fee_collected: stored.platform_fee_collected,
            winner_split_rule: stored.winner_split_rule,
            current_round: stored.current_round,
            tournament_rounds: stored.tournament_rounds,
            winners,
        })
    }

    // -- Scheduling --

    /// A sweeper bound to this engine's services. Run it (or several — they
    /// coordinate through the store's guards) to drive time-based
    /// transitions.
    pub fn sweeper(&self, config: SweepConfig) -> Sweeper<S> {
        Sweeper::new(
            self.store.clone(),
            self.rooms.clone(),
            self.tournaments.clone(),
            config,
        )
    }
}
