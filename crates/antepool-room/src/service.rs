//! Room service: creates rooms, applies participant actions, and reconciles
//! stored status against the clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use antepool_payout::{distribute_prizes, DistributionOutcome};
use antepool_store::Store;
use antepool_types::{Amount, Participant, Room, RoomId, RoomKind, RoomStatus, UserId};
use chrono::{DateTime, Utc};

use crate::{effective_status, RoomConfig, RoomError};

/// What one reconcile pass did to a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Stored status already matched the clock (or another caller got there
    /// first).
    Unchanged,
    /// The room crossed its start boundary and is now ongoing.
    Started,
    /// The room crossed its end boundary and prizes were distributed.
    Finalized,
    /// The start boundary arrived with too few players; the room was
    /// cancelled and entry fees refunded.
    CancelledUnderMin,
}

/// Creates, mutates, and reconciles rooms against a [`Store`].
///
/// All time-dependent methods take an explicit `now` so schedulers and tests
/// control the clock. Transitions that race (start vs. cancel, duplicate
/// finalization) are serialized by the store's conditional status writes.
pub struct RoomService<S> {
    store: Arc<S>,
    next_room_id: AtomicU64,
}

impl<S: Store> RoomService<S> {
    pub fn new(store: Arc<S>) -> RoomService<S> {
        RoomService {
            store,
            next_room_id: AtomicU64::new(1),
        }
    }

    /// Creates a room in `waiting` status. Sponsored rooms start with the
    /// sponsor seed already in the pool.
    pub async fn create_room(&self, config: RoomConfig) -> Result<Room, RoomError> {
        config.validate()?;

        let id = RoomId(self.next_room_id.fetch_add(1, Ordering::Relaxed));
        let pool = if config.is_sponsored {
            config.sponsor_seed
        } else {
            Amount::ZERO
        };
        let room = Room {
            id,
            game_id: config.game_id,
            kind: config.kind,
            status: RoomStatus::Waiting,
            start_time: config.start_time,
            end_time: config.end_time,
            actual_start_time: None,
            actual_end_time: None,
            max_players: config.max_players,
            min_players_to_start: config.min_players_to_start,
            current_players: 0,
            entry_fee: config.entry_fee,
            currency: config.currency,
            total_prize_pool: pool,
            platform_fee_collected: Amount::ZERO,
            winner_split_rule: config.winner_split_rule,
            is_sponsored: config.is_sponsored,
            current_round: 0,
            tournament_rounds: 0,
        };
        self.store.insert_room(room.clone()).await?;

        tracing::info!(
            room_id = %room.id,
            kind = ?room.kind,
            entry_fee = %room.entry_fee,
            "room created"
        );
        Ok(room)
    }

    /// Adds a participant: seat taken, entry fee into the pool.
    pub async fn join(
        &self,
        room_id: RoomId,
        user: UserId,
        now: DateTime<Utc>,
    ) -> Result<Participant, RoomError> {
        let mut room = self.store.get_room(room_id).await?;

        let status = effective_status(&room, now);
        if !status.is_joinable() {
            return Err(RoomError::NotJoinable(room_id, status));
        }
        if room.is_full() {
            return Err(RoomError::RoomFull(room_id));
        }
        if self.store.get_participant(room_id, user).await.is_ok() {
            return Err(RoomError::AlreadyJoined(room_id, user));
        }

        let participant = Participant::new(room_id, user, now);
        self.store.insert_participant(participant.clone()).await?;

        room.current_players += 1;
        room.total_prize_pool += room.entry_fee;
        self.store.update_room(&room).await?;

        tracing::info!(
            room_id = %room_id,
            user_id = %user,
            players = room.current_players,
            pool = %room.total_prize_pool,
            "participant joined"
        );
        Ok(participant)
    }

    /// Soft-removes a participant and takes their fee back out of the pool.
    /// Only possible while the room is still waiting; the fee itself is
    /// returned by the wallet layer.
    pub async fn leave(
        &self,
        room_id: RoomId,
        user: UserId,
        now: DateTime<Utc>,
    ) -> Result<(), RoomError> {
        let mut room = self.store.get_room(room_id).await?;
        if effective_status(&room, now) != RoomStatus::Waiting {
            return Err(RoomError::LeaveAfterStart(room_id));
        }

        let mut participant = self.store.get_participant(room_id, user).await?;
        participant.is_active = false;
        self.store.update_participant(&participant).await?;

        room.current_players = room.current_players.saturating_sub(1);
        room.total_prize_pool = room.total_prize_pool.saturating_sub(room.entry_fee);
        self.store.update_room(&room).await?;

        tracing::info!(
            room_id = %room_id,
            user_id = %user,
            players = room.current_players,
            "participant left"
        );
        Ok(())
    }

    /// Records a score for a score-contest participant. Last write wins;
    /// submissions are independent per user, so no cross-participant
    /// ordering is needed.
    pub async fn submit_score(
        &self,
        room_id: RoomId,
        user: UserId,
        score: u64,
        now: DateTime<Utc>,
    ) -> Result<(), RoomError> {
        let room = self.store.get_room(room_id).await?;
        if room.kind != RoomKind::ScoreContest {
            return Err(RoomError::NotAScoreContest(room_id));
        }
        let status = effective_status(&room, now);
        if status != RoomStatus::Ongoing {
            return Err(RoomError::NotAcceptingScores(room_id, status));
        }

        let mut participant = self.store.get_participant(room_id, user).await?;
        participant.score = Some(score);
        self.store.update_participant(&participant).await?;

        tracing::debug!(room_id = %room_id, user_id = %user, score, "score submitted");
        Ok(())
    }

    /// Manually cancels a waiting room before its start time and refunds
    /// every active participant's entry fee in full — no platform fee is
    /// retained on cancellation. Uses the same waiting-state guard as the
    /// start transition, so a room can never be started and cancelled at
    /// once; losing that race reports the window as closed.
    pub async fn cancel(&self, room_id: RoomId, now: DateTime<Utc>) -> Result<Room, RoomError> {
        let room = self.store.get_room(room_id).await?;
        if room.status != RoomStatus::Waiting || now >= room.start_time {
            return Err(RoomError::CancelWindowClosed(room_id));
        }

        let mut room = match self
            .store
            .transition_room_status(room_id, RoomStatus::Waiting, RoomStatus::Cancelled)
            .await
        {
            Ok(room) => room,
            Err(err) if err.is_conflict() => {
                return Err(RoomError::CancelWindowClosed(room_id));
            }
            Err(err) => return Err(err.into()),
        };

        let refunded = self.refund_entry_fees(&mut room).await?;
        self.store.update_room(&room).await?;

        tracing::info!(room_id = %room_id, refunded, "room cancelled, entry fees refunded");
        Ok(room)
    }

    /// Brings a room's stored status in line with the clock. Idempotent:
    /// safe to call from multiple schedulers; losers of the underlying
    /// guards report [`ReconcileOutcome::Unchanged`].
    ///
    /// At the start boundary a room below its player minimum is cancelled
    /// with a full refund instead of started. A room whose entire window
    /// has already elapsed is started (or under-min cancelled) and then
    /// finalized in the same pass.
    pub async fn reconcile(
        &self,
        room_id: RoomId,
        now: DateTime<Utc>,
    ) -> Result<ReconcileOutcome, RoomError> {
        let room = self.store.get_room(room_id).await?;
        if effective_status(&room, now) == room.status {
            return Ok(ReconcileOutcome::Unchanged);
        }

        match room.status {
            RoomStatus::Waiting => {
                if room.current_players < room.min_players_to_start {
                    return self.cancel_under_min(room_id).await;
                }

                match self
                    .store
                    .transition_room_status(room_id, RoomStatus::Waiting, RoomStatus::Ongoing)
                    .await
                {
                    Ok(mut started) => {
                        started.actual_start_time = Some(now);
                        self.store.update_room(&started).await?;
                        tracing::info!(
                            room_id = %room_id,
                            players = started.current_players,
                            "room started"
                        );
                        if now >= started.end_time {
                            // Slept through the whole window.
                            return self.finalize(room_id, now).await;
                        }
                        Ok(ReconcileOutcome::Started)
                    }
                    Err(err) if err.is_conflict() => Ok(ReconcileOutcome::Unchanged),
                    Err(err) => Err(err.into()),
                }
            }
            RoomStatus::Ongoing => self.finalize(room_id, now).await,
            // In-flight finalization or terminal; nothing to do.
            RoomStatus::Finalizing | RoomStatus::Completed | RoomStatus::Cancelled => {
                Ok(ReconcileOutcome::Unchanged)
            }
        }
    }

    async fn finalize(
        &self,
        room_id: RoomId,
        now: DateTime<Utc>,
    ) -> Result<ReconcileOutcome, RoomError> {
        match distribute_prizes(self.store.as_ref(), room_id, now).await? {
            DistributionOutcome::Distributed { .. } => Ok(ReconcileOutcome::Finalized),
            DistributionOutcome::AlreadyHandled => Ok(ReconcileOutcome::Unchanged),
        }
    }

    async fn cancel_under_min(&self, room_id: RoomId) -> Result<ReconcileOutcome, RoomError> {
        let mut room = match self
            .store
            .transition_room_status(room_id, RoomStatus::Waiting, RoomStatus::Cancelled)
            .await
        {
            Ok(room) => room,
            Err(err) if err.is_conflict() => return Ok(ReconcileOutcome::Unchanged),
            Err(err) => return Err(err.into()),
        };

        let refunded = self.refund_entry_fees(&mut room).await?;
        self.store.update_room(&room).await?;

        tracing::info!(
            room_id = %room_id,
            players = room.current_players,
            needed = room.min_players_to_start,
            refunded,
            "room cancelled at start: not enough players"
        );
        Ok(ReconcileOutcome::CancelledUnderMin)
    }

    /// Removes every active participant's fee from the pool. The sponsor
    /// seed, if any, stays behind for the operator to reclaim.
    async fn refund_entry_fees(&self, room: &mut Room) -> Result<usize, RoomError> {
        let participants = self.store.list_active_participants(room.id).await?;
        let total = Amount(room.entry_fee.0 * participants.len() as u64);
        room.total_prize_pool = room.total_prize_pool.saturating_sub(total);
        Ok(participants.len())
    }
}
