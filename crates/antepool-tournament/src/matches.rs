//! Match lifecycle: pending → active → completed/timeout, round advancement,
//! and tournament completion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use antepool_payout::{distribute_prizes, DistributionOutcome};
use antepool_store::Store;
use antepool_types::{
    MatchId, MatchStatus, RoomId, RoomStatus, TournamentConfig, TournamentMatch, UserId,
};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::{generate_bracket, Bracket, TournamentError};

/// One round of a bracket, for display and admin tooling.
#[derive(Debug, Clone)]
pub struct RoundView {
    pub round: u32,
    pub matches: Vec<TournamentMatch>,
}

/// The full bracket of a room, grouped by round.
#[derive(Debug, Clone)]
pub struct BracketView {
    pub room_id: RoomId,
    pub current_round: u32,
    pub total_rounds: u32,
    pub rounds: Vec<RoundView>,
}

/// Drives tournaments: generates brackets, transitions matches, advances
/// rounds, and finalizes the room when the final match resolves.
///
/// Match transitions go through the store's conditional status writes, so
/// each transition has a single winner; a caller that loses the race gets a
/// conflict back. Round advancement is claimed the same way via the room's
/// conditional round counter.
pub struct TournamentService<S> {
    store: Arc<S>,
    next_match_id: AtomicU64,
}

impl<S: Store> TournamentService<S> {
    pub fn new(store: Arc<S>) -> TournamentService<S> {
        TournamentService {
            store,
            next_match_id: AtomicU64::new(1),
        }
    }

    /// Generates and persists the bracket for an ongoing tournament room,
    /// seeds it from the active participants in join order, and opens
    /// round 1. Round-1 byes credit their winner immediately.
    pub async fn create_tournament<R: Rng>(
        &self,
        room_id: RoomId,
        config: &TournamentConfig,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Bracket, TournamentError> {
        let mut room = self.store.get_room(room_id).await?;
        if !room.is_tournament() {
            return Err(TournamentError::NotATournament(room_id));
        }
        if room.status != RoomStatus::Ongoing {
            return Err(TournamentError::RoomNotOngoing(room_id, room.status));
        }
        if room.has_bracket() {
            return Err(TournamentError::BracketExists(room_id));
        }

        let participants = self.store.list_active_participants(room_id).await?;
        let field: Vec<UserId> = participants.iter().map(|p| p.user_id).collect();
        let bracket = generate_bracket(room_id, &field, config, now, rng, || {
            MatchId(self.next_match_id.fetch_add(1, Ordering::Relaxed))
        })?;

        match self.store.insert_matches(room_id, bracket.matches.clone()).await {
            Ok(()) => {}
            Err(err) if err.is_conflict() => {
                return Err(TournamentError::BracketExists(room_id));
            }
            Err(err) => return Err(err.into()),
        }

        room.tournament_rounds = bracket.total_rounds;
        room.current_round = 1;
        self.store.update_room(&room).await?;

        for bye_winner in bracket.matches.iter().filter(|m| m.is_bye).filter_map(|m| m.winner) {
            self.credit_match_win(room_id, bye_winner).await?;
        }

        tracing::info!(
            room_id = %room_id,
            elimination = %config.elimination,
            players = field.len(),
            rounds = bracket.total_rounds,
            matches = bracket.matches.len(),
            "bracket generated"
        );
        Ok(bracket)
    }

    /// Starts a pending match of the current round. Single-writer: the
    /// pending→active transition is conditional, so exactly one caller wins.
    pub async fn start_match(
        &self,
        id: MatchId,
        now: DateTime<Utc>,
    ) -> Result<TournamentMatch, TournamentError> {
        let m = self.store.get_match(id).await?;
        if m.status != MatchStatus::Pending {
            return Err(TournamentError::NotPending(id, m.status));
        }

        let room = self.store.get_room(m.room_id).await?;
        if m.round != room.current_round {
            return Err(TournamentError::RoundNotCurrent {
                id,
                round: m.round,
                current: room.current_round,
            });
        }
        // Placeholder matches stay unstartable until their feeders deliver.
        if m.occupant_count() < 2 {
            return Err(TournamentError::SlotsUnfilled(id));
        }

        let mut started = self
            .store
            .transition_match_status(id, MatchStatus::Pending, MatchStatus::Active)
            .await?;
        started.started_at = Some(now);
        self.store.update_match(&started).await?;

        tracing::info!(room_id = %started.room_id, match_id = %id, round = started.round, "match started");
        Ok(started)
    }

    /// Completes an active match with the given winner, credits the win,
    /// and advances the round if this was its last unresolved match.
    pub async fn complete_match(
        &self,
        id: MatchId,
        winner: UserId,
        now: DateTime<Utc>,
    ) -> Result<TournamentMatch, TournamentError> {
        let m = self.store.get_match(id).await?;
        if m.status != MatchStatus::Active {
            return Err(TournamentError::NotActive(id, m.status));
        }
        if !m.has_player(winner) {
            return Err(TournamentError::NotInMatch(id, winner));
        }

        let mut completed = self
            .store
            .transition_match_status(id, MatchStatus::Active, MatchStatus::Completed)
            .await?;
        completed.winner = Some(winner);
        completed.completed_at = Some(now);
        self.store.update_match(&completed).await?;

        self.credit_match_win(completed.room_id, winner).await?;
        tracing::info!(
            room_id = %completed.room_id,
            match_id = %id,
            winner = %winner,
            "match completed"
        );

        self.advance_if_round_resolved(completed.room_id, completed.round, now).await?;
        Ok(completed)
    }

    /// Times out an active match whose limit has elapsed. The tie-break is
    /// deterministic: the occupant of the lowest filled slot — the higher
    /// seed — advances as winner.
    pub async fn timeout_match(
        &self,
        id: MatchId,
        now: DateTime<Utc>,
    ) -> Result<TournamentMatch, TournamentError> {
        let m = self.store.get_match(id).await?;
        if m.status != MatchStatus::Active {
            return Err(TournamentError::NotActive(id, m.status));
        }
        let deadline = m
            .started_at
            .map(|t| t + Duration::minutes(m.time_limit_minutes as i64));
        if deadline.is_none_or(|d| now < d) {
            return Err(TournamentError::TimeLimitNotElapsed(id));
        }

        let mut timed_out = self
            .store
            .transition_match_status(id, MatchStatus::Active, MatchStatus::Timeout)
            .await?;
        timed_out.winner = timed_out.highest_seed();
        timed_out.completed_at = Some(now);
        self.store.update_match(&timed_out).await?;

        if let Some(winner) = timed_out.winner {
            self.credit_match_win(timed_out.room_id, winner).await?;
        }
        tracing::warn!(
            room_id = %timed_out.room_id,
            match_id = %id,
            winner = ?timed_out.winner,
            "match timed out, higher seed advances"
        );

        self.advance_if_round_resolved(timed_out.room_id, timed_out.round, now).await?;
        Ok(timed_out)
    }

    /// Times out every active match in the room whose limit has elapsed.
    /// Used by the sweeper so no match can hang a round. Races with direct
    /// completions are fine: the loser's transition conflicts and is skipped.
    pub async fn timeout_due_matches(
        &self,
        room_id: RoomId,
        now: DateTime<Utc>,
    ) -> Result<usize, TournamentError> {
        let matches = self.store.list_matches(room_id).await?;
        let mut timed_out = 0usize;
        for m in matches {
            if m.status != MatchStatus::Active {
                continue;
            }
            let due = m
                .started_at
                .is_some_and(|t| now >= t + Duration::minutes(m.time_limit_minutes as i64));
            if due && self.timeout_match(m.id, now).await.is_ok() {
                timed_out += 1;
            }
        }
        Ok(timed_out)
    }

    /// The bracket grouped by round, for UI and admin tooling.
    pub async fn bracket(&self, room_id: RoomId) -> Result<BracketView, TournamentError> {
        let room = self.store.get_room(room_id).await?;
        if !room.is_tournament() {
            return Err(TournamentError::NotATournament(room_id));
        }

        let matches = self.store.list_matches(room_id).await?;
        let mut rounds: Vec<RoundView> = Vec::new();
        for m in matches {
            match rounds.last_mut() {
                Some(view) if view.round == m.round => view.matches.push(m),
                _ => rounds.push(RoundView { round: m.round, matches: vec![m] }),
            }
        }

        Ok(BracketView {
            room_id,
            current_round: room.current_round,
            total_rounds: room.tournament_rounds,
            rounds,
        })
    }

    /// Advances past `round` if every one of its matches is resolved:
    /// winners are written into the next round's slots, single-occupant
    /// placeholders resolve as byes, and the loop continues while byes keep
    /// completing rounds. The final round hands off to prize distribution.
    async fn advance_if_round_resolved(
        &self,
        room_id: RoomId,
        mut round: u32,
        now: DateTime<Utc>,
    ) -> Result<(), TournamentError> {
        loop {
            let finished = self.store.list_matches_by_round(room_id, round).await?;
            if finished.is_empty() || !finished.iter().all(|m| m.status.is_resolved()) {
                return Ok(());
            }

            let room = self.store.get_room(room_id).await?;
            if room.current_round != round {
                // Another caller is ahead of us.
                return Ok(());
            }

            if round >= room.tournament_rounds {
                let champion = finished.last().and_then(|m| m.winner);
                match distribute_prizes(self.store.as_ref(), room_id, now).await? {
                    DistributionOutcome::Distributed { .. } => {
                        tracing::info!(
                            room_id = %room_id,
                            champion = ?champion,
                            "tournament complete"
                        );
                    }
                    DistributionOutcome::AlreadyHandled => {}
                }
                return Ok(());
            }

            // Claim the advance; the loser of this race stops here.
            match self.store.advance_room_round(room_id, round, round + 1).await {
                Ok(_) => {}
                Err(err) if err.is_conflict() => return Ok(()),
                Err(err) => return Err(err.into()),
            }

            let mut next = self.store.list_matches_by_round(room_id, round + 1).await?;
            // Winners feed the next round in match order: feeder i fills
            // slot i % f of next-round match i / f.
            let feeders_per_match = finished.len().div_ceil(next.len());
            for (i, m) in finished.iter().enumerate() {
                let Some(winner) = m.winner else { continue };
                let target = &mut next[i / feeders_per_match];
                if let Some(slot) = target.open_slot() {
                    target.players[slot] = Some(winner);
                }
            }

            let mut bye_winners: Vec<UserId> = Vec::new();
            for m in &mut next {
                if m.status == MatchStatus::Pending && m.occupant_count() == 1 {
                    m.is_bye = true;
                    m.status = MatchStatus::Completed;
                    m.winner = m.highest_seed();
                    m.completed_at = Some(now);
                    bye_winners.extend(m.winner);
                }
                self.store.update_match(m).await?;
            }
            for winner in bye_winners {
                self.credit_match_win(room_id, winner).await?;
            }

            tracing::info!(room_id = %room_id, round = round + 1, "round advanced");
            round += 1;
        }
    }

    /// A match win is worth one point toward the room ranking, so the
    /// champion ends with the most wins and the payout pipeline ranks the
    /// field by progression.
    async fn credit_match_win(&self, room_id: RoomId, user: UserId) -> Result<(), TournamentError> {
        let mut participant = self.store.get_participant(room_id, user).await?;
        participant.score = Some(participant.effective_score() + 1);
        self.store.update_participant(&participant).await?;
        Ok(())
    }
}
