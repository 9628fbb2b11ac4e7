//! Integration tests for the reconciliation sweeper.

use std::sync::Arc;

use antepool_room::{RoomConfig, RoomService};
use antepool_store::{MemoryStore, Store};
use antepool_sweep::{SweepConfig, Sweeper};
use antepool_tournament::TournamentService;
use antepool_types::{GameId, MatchStatus, RoomKind, RoomStatus, TournamentConfig, UserId};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap()
}

struct Fixture {
    store: Arc<MemoryStore>,
    rooms: Arc<RoomService<MemoryStore>>,
    tournaments: Arc<TournamentService<MemoryStore>>,
    sweeper: Sweeper<MemoryStore>,
}

impl Fixture {
    fn new() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let rooms = Arc::new(RoomService::new(store.clone()));
        let tournaments = Arc::new(TournamentService::new(store.clone()));
        let sweeper = Sweeper::new(
            store.clone(),
            rooms.clone(),
            tournaments.clone(),
            SweepConfig::default(),
        );
        Fixture { store, rooms, tournaments, sweeper }
    }
}

#[tokio::test]
async fn test_sweep_walks_rooms_through_their_windows() {
    let mut fx = Fixture::new();
    let config = RoomConfig::new(
        GameId(1),
        RoomKind::ScoreContest,
        start(),
        start() + Duration::hours(1),
    );
    let room = fx.rooms.create_room(config).await.unwrap();
    let before = start() - Duration::minutes(10);
    fx.rooms.join(room.id, UserId(1), before).await.unwrap();
    fx.rooms.join(room.id, UserId(2), before).await.unwrap();

    // Before the window: nothing to do.
    let report = fx.sweeper.sweep_once(before).await;
    assert_eq!(report.rooms_changed, 0);

    // Inside the window: the room starts.
    let report = fx.sweeper.sweep_once(start() + Duration::minutes(1)).await;
    assert_eq!(report.rooms_changed, 1);
    assert_eq!(report.rooms_finalized, 0);

    fx.rooms
        .submit_score(room.id, UserId(1), 700, start() + Duration::minutes(2))
        .await
        .unwrap();

    // Past the window: the room finalizes; later sweeps skip it entirely.
    let report = fx.sweeper.sweep_once(start() + Duration::hours(2)).await;
    assert_eq!(report.rooms_finalized, 1);
    let stored = fx.store.get_room(room.id).await.unwrap();
    assert_eq!(stored.status, RoomStatus::Completed);

    let report = fx.sweeper.sweep_once(start() + Duration::hours(3)).await;
    assert_eq!(report, Default::default());
    assert_eq!(fx.sweeper.stats().sweeps, 4);
    assert_eq!(fx.sweeper.stats().rooms_finalized, 1);
}

#[tokio::test]
async fn test_sweep_times_out_overdue_tournament_matches() {
    let mut fx = Fixture::new();
    let mut config = RoomConfig::new(
        GameId(1),
        RoomKind::Tournament,
        start(),
        start() + Duration::hours(4),
    );
    config.max_players = 16;
    let room = fx.rooms.create_room(config).await.unwrap();
    let before = start() - Duration::minutes(10);
    for user in 1..=4 {
        fx.rooms.join(room.id, UserId(user), before).await.unwrap();
    }
    fx.rooms.reconcile(room.id, start()).await.unwrap();
    fx.tournaments
        .create_tournament(room.id, &TournamentConfig::default(), start(), &mut StdRng::seed_from_u64(2))
        .await
        .unwrap();

    // Start both round-1 matches, then let the clock blow past the limit.
    let round1 = fx.store.list_matches_by_round(room.id, 1).await.unwrap();
    let match_start = start() + Duration::minutes(1);
    fx.tournaments.start_match(round1[0].id, match_start).await.unwrap();
    fx.tournaments.start_match(round1[1].id, match_start).await.unwrap();

    let overdue = match_start + Duration::minutes(30);
    let report = fx.sweeper.sweep_once(overdue).await;
    assert_eq!(report.matches_timed_out, 2);
    assert_eq!(report.errors, 0);

    // Both timeouts advanced the higher seeds into the final.
    let round1 = fx.store.list_matches_by_round(room.id, 1).await.unwrap();
    assert!(round1.iter().all(|m| m.status == MatchStatus::Timeout));
    let stored = fx.store.get_room(room.id).await.unwrap();
    assert_eq!(stored.current_round, 2);
    let finals = fx.store.list_matches_by_round(room.id, 2).await.unwrap();
    assert_eq!(finals[0].occupant_count(), 2);
}

#[tokio::test]
async fn test_sweep_cancels_under_min_rooms_at_start() {
    let mut fx = Fixture::new();
    let config = RoomConfig::new(
        GameId(1),
        RoomKind::ScoreContest,
        start(),
        start() + Duration::hours(1),
    );
    let room = fx.rooms.create_room(config).await.unwrap();
    fx.rooms.join(room.id, UserId(1), start() - Duration::minutes(5)).await.unwrap();

    let report = fx.sweeper.sweep_once(start() + Duration::minutes(1)).await;
    assert_eq!(report.rooms_changed, 1);

    let stored = fx.store.get_room(room.id).await.unwrap();
    assert_eq!(stored.status, RoomStatus::Cancelled);
}
