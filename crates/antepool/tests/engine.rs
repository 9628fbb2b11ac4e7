//! End-to-end scenarios through the engine facade.

use std::sync::Arc;

use antepool::prelude::*;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap()
}

fn engine() -> Engine<MemoryStore> {
    Engine::new(Arc::new(MemoryStore::new()))
}

/// 4 participants, scores [1500, 1200, 800, 500], top_3 at 50/30/20,
/// pool 40.00 → fee 2.80, distributable 37.20 → 18.60 / 11.16 / 7.44.
#[tokio::test]
async fn test_score_contest_end_to_end() {
    let engine = engine();
    let config = RoomConfig::new(
        GameId(1),
        RoomKind::ScoreContest,
        start(),
        start() + Duration::hours(1),
    );
    let room = engine.create_room(config).await.unwrap();

    let before = start() - Duration::minutes(10);
    for user in 1..=4 {
        engine.join_room(room.id, UserId(user), before).await.unwrap();
    }

    let during = start() + Duration::minutes(5);
    assert_eq!(engine.reconcile(room.id, during).await.unwrap(), ReconcileOutcome::Started);

    for (user, score) in [(1, 1500u64), (2, 1200), (3, 800), (4, 500)] {
        engine.submit_score(room.id, UserId(user), score, during).await.unwrap();
    }

    let after = start() + Duration::hours(2);
    assert_eq!(engine.reconcile(room.id, after).await.unwrap(), ReconcileOutcome::Finalized);

    let stats = engine.get_stats(room.id).await.unwrap();
    assert_eq!(stats.status, RoomStatus::Completed);
    assert_eq!(stats.total_prize_pool, Amount::from_major(40));
    assert_eq!(stats.platform_fee_collected, Amount(280));
    assert_eq!(stats.winners.len(), 3);
    let amounts: Vec<Amount> = stats.winners.iter().map(|w| w.prize_amount).collect();
    assert_eq!(amounts, vec![Amount(1860), Amount(1116), Amount(744)]);

    // 4th participant: no earnings, no position.
    let fourth = engine.store().get_participant(room.id, UserId(4)).await.unwrap();
    assert_eq!(fourth.earnings, Amount::ZERO);
    assert_eq!(fourth.final_position, None);

    // Reconcile is idempotent after completion.
    assert_eq!(engine.reconcile(room.id, after).await.unwrap(), ReconcileOutcome::Unchanged);
    assert_eq!(engine.get_stats(room.id).await.unwrap().winners.len(), 3);
}

/// 8 participants, single elimination → 3 rounds, 4 first-round matches, no
/// byes, and a champion who wins every round.
#[tokio::test]
async fn test_tournament_end_to_end() {
    let engine = engine();
    let mut config = RoomConfig::new(
        GameId(2),
        RoomKind::Tournament,
        start(),
        start() + Duration::hours(4),
    );
    config.max_players = 8;
    let room = engine.create_room(config).await.unwrap();

    let before = start() - Duration::minutes(10);
    for user in 1..=8 {
        engine.join_room(room.id, UserId(user), before).await.unwrap();
    }
    engine.reconcile(room.id, start()).await.unwrap();

    let bracket = engine
        .create_tournament_with_rng(
            room.id,
            &TournamentConfig::default(),
            start(),
            &mut StdRng::seed_from_u64(11),
        )
        .await
        .unwrap();
    assert_eq!(bracket.total_rounds, 3);

    let view = engine.get_bracket(room.id).await.unwrap();
    assert_eq!(view.current_round, 1);
    assert_eq!(view.rounds[0].matches.len(), 4);
    assert!(view.rounds[0].matches.iter().all(|m| !m.is_bye));

    // Play every round; slot 0 always wins.
    let mut now = start() + Duration::minutes(5);
    for round in 1..=3 {
        let matches = engine.store().list_matches_by_round(room.id, round).await.unwrap();
        for m in &matches {
            if m.status != MatchStatus::Pending {
                continue;
            }
            engine.start_match(m.id, now).await.unwrap();
            engine.complete_match(m.id, m.players[0].unwrap(), now).await.unwrap();
        }
        now += Duration::minutes(30);
    }

    let stats = engine.get_stats(room.id).await.unwrap();
    assert_eq!(stats.status, RoomStatus::Completed);
    // Pool 80.00 → fee 5.60.
    assert_eq!(stats.platform_fee_collected, Amount(560));
    assert_eq!(stats.winners.len(), 3);

    let view = engine.get_bracket(room.id).await.unwrap();
    let champion = view.rounds[2].matches[0].winner.unwrap();
    assert_eq!(stats.winners[0].user_id, champion);
    assert_eq!(stats.winners[0].prize_amount, Amount(3720));
}

#[tokio::test]
async fn test_cancel_room_through_facade() {
    let engine = engine();
    let config = RoomConfig::new(
        GameId(1),
        RoomKind::ScoreContest,
        start(),
        start() + Duration::hours(1),
    );
    let room = engine.create_room(config).await.unwrap();
    let before = start() - Duration::minutes(30);

    engine.join_room(room.id, UserId(1), before).await.unwrap();
    engine.join_room(room.id, UserId(2), before).await.unwrap();

    let cancelled = engine.cancel_room(room.id, before).await.unwrap();
    assert_eq!(cancelled.status, RoomStatus::Cancelled);
    assert_eq!(cancelled.total_prize_pool, Amount::ZERO);

    // Terminal: joining and reconciling are both dead ends now.
    assert!(engine.join_room(room.id, UserId(3), before).await.is_err());
    assert_eq!(
        engine.reconcile(room.id, start() + Duration::hours(2)).await.unwrap(),
        ReconcileOutcome::Unchanged
    );
}

#[tokio::test]
async fn test_leave_then_under_min_cancellation() {
    let engine = engine();
    let config = RoomConfig::new(
        GameId(1),
        RoomKind::ScoreContest,
        start(),
        start() + Duration::hours(1),
    );
    let room = engine.create_room(config).await.unwrap();
    let before = start() - Duration::minutes(30);

    engine.join_room(room.id, UserId(1), before).await.unwrap();
    engine.join_room(room.id, UserId(2), before).await.unwrap();
    engine.leave_room(room.id, UserId(2), before).await.unwrap();

    // Down to one player at the start boundary → auto-cancel with refunds.
    let outcome = engine.reconcile(room.id, start()).await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::CancelledUnderMin);

    let stats = engine.get_stats(room.id).await.unwrap();
    assert_eq!(stats.status, RoomStatus::Cancelled);
    assert_eq!(stats.total_prize_pool, Amount::ZERO);
    assert!(stats.winners.is_empty());
}
