//! Prize distribution: the one place money leaves the pool.

use antepool_types::{
    Amount, LeaderboardEntry, LeaderboardKey, LeaderboardPeriod, Room, RoomId, RoomStatus, UserId,
    WinnerRecord,
};
use antepool_store::{Store, StoreError};
use chrono::{DateTime, Utc};

use crate::{resolve_winners, PayoutError};

/// Fixed platform cut, taken off the pool before any split.
pub const PLATFORM_FEE_PERCENT: u8 = 7;

/// What a distribution call accomplished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributionOutcome {
    /// This caller won the finalization guard and paid out.
    Distributed { winners: usize, platform_fee: Amount },
    /// Another caller holds (or already finished) finalization; nothing was
    /// changed. Racing callers land here — by design, not an error.
    AlreadyHandled,
}

/// Runs prize distribution for a room, exactly once.
///
/// Claims the room via the conditional ongoing→finalizing transition; a
/// caller that loses that race returns [`DistributionOutcome::AlreadyHandled`]
/// without touching anything. The winner of the race:
///
/// 1. takes the 7% platform fee off the pool,
/// 2. pays each ranked position its split percentage of the remainder,
/// 3. finalizes participant rows and appends winner-ledger rows,
/// 4. bumps per-game and global leaderboards (best-effort: failures are
///    logged and skipped, never rolled back),
/// 5. commits the room to completed with the fee recorded.
///
/// An empty winner list (nobody scored) still completes the room, with no
/// fee collected and no ledger rows.
pub async fn distribute_prizes<S: Store>(
    store: &S,
    room_id: RoomId,
    now: DateTime<Utc>,
) -> Result<DistributionOutcome, PayoutError> {
    let mut room = match store
        .transition_room_status(room_id, RoomStatus::Ongoing, RoomStatus::Finalizing)
        .await
    {
        Ok(room) => room,
        Err(err) if err.is_conflict() => {
            tracing::debug!(room_id = %room_id, "finalization already claimed, skipping");
            return Ok(DistributionOutcome::AlreadyHandled);
        }
        Err(err) => return Err(err.into()),
    };

    let participants = store.list_active_participants(room_id).await?;
    let winners = resolve_winners(&participants, room.winner_split_rule);

    let platform_fee = if winners.is_empty() {
        Amount::ZERO
    } else {
        room.total_prize_pool.percent(PLATFORM_FEE_PERCENT)
    };
    let distributable = room.total_prize_pool.saturating_sub(platform_fee);
    let percentages = room.winner_split_rule.payout_percentages();

    for winner in &winners {
        let prize_percentage = percentages[winner.position as usize - 1];
        let earnings = distributable.percent(prize_percentage);

        let Some(mut participant) = participants
            .iter()
            .find(|p| p.user_id == winner.user_id)
            .cloned()
        else {
            continue;
        };
        participant.final_position = Some(winner.position);
        participant.earnings = earnings;
        store.update_participant(&participant).await?;

        store
            .insert_winner_record(WinnerRecord {
                room_id,
                user_id: winner.user_id,
                position: winner.position,
                prize_percentage,
                prize_amount: earnings,
                recorded_at: now,
            })
            .await?;

        bump_leaderboards(store, &room, winner.user_id, winner.score, earnings, winner.position == 1)
            .await;
    }

    for participant in &participants {
        if winners.iter().any(|w| w.user_id == participant.user_id) {
            continue;
        }
        bump_leaderboards(
            store,
            &room,
            participant.user_id,
            participant.effective_score(),
            Amount::ZERO,
            false,
        )
        .await;
    }

    room.status = RoomStatus::Completed;
    room.actual_end_time = Some(now);
    room.platform_fee_collected = platform_fee;
    store.update_room(&room).await?;

    tracing::info!(
        room_id = %room_id,
        winners = winners.len(),
        platform_fee = %platform_fee,
        pool = %room.total_prize_pool,
        "room finalized"
    );

    Ok(DistributionOutcome::Distributed {
        winners: winners.len(),
        platform_fee,
    })
}

/// Bumps the per-game and global leaderboard entries for one participant.
///
/// Best-effort on both scopes: a failed read or write is logged at warn and
/// skipped so participant/winner finalization is never held hostage by the
/// leaderboard backend.
async fn bump_leaderboards<S: Store>(
    store: &S,
    room: &Room,
    user: UserId,
    score: u64,
    earnings: Amount,
    won_room: bool,
) {
    for game_id in [Some(room.game_id), None] {
        let key = LeaderboardKey {
            user_id: user,
            game_id,
            period: LeaderboardPeriod::AllTime,
        };
        if let Err(err) = bump_entry(store, &key, score, earnings, won_room).await {
            tracing::warn!(
                room_id = %room.id,
                user_id = %user,
                global = game_id.is_none(),
                error = %err,
                "leaderboard update failed, skipping"
            );
        }
    }
}

async fn bump_entry<S: Store>(
    store: &S,
    key: &LeaderboardKey,
    score: u64,
    earnings: Amount,
    won_room: bool,
) -> Result<(), StoreError> {
    let mut entry = store
        .get_leaderboard_entry(key)
        .await?
        .unwrap_or_else(|| LeaderboardEntry::new(key.clone()));

    // Score is a running maximum, tracked on per-game scopes only.
    if key.game_id.is_some() {
        entry.total_score = entry.total_score.max(score);
    }
    entry.games_played += 1;
    if won_room {
        entry.wins += 1;
    }
    entry.total_earnings += earnings;

    store.upsert_leaderboard_entry(entry).await
}
