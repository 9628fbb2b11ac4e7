//! Weekend cup: runs one score contest and one 8-player single-elimination
//! tournament end to end against the in-memory store, with a simulated
//! clock so the whole weekend takes milliseconds.

use std::sync::Arc;

use antepool::prelude::*;
use chrono::{DateTime, Duration, Utc};

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let engine = Engine::new(Arc::new(MemoryStore::new()));
    let opens = Utc::now() + Duration::minutes(5);

    score_contest(&engine, opens).await?;
    tournament(&engine, opens).await?;
    Ok(())
}

/// Saturday: a one-hour score contest, 10.00 entry, top-3 split.
async fn score_contest(engine: &Engine<MemoryStore>, opens: DateTime<Utc>) -> Result<(), EngineError> {
    let config = RoomConfig::new(
        GameId(1),
        RoomKind::ScoreContest,
        opens,
        opens + Duration::hours(1),
    );
    let room = engine.create_room(config).await?;

    let lobby = opens - Duration::minutes(3);
    for user in 1..=4 {
        engine.join_room(room.id, UserId(user), lobby).await?;
    }

    let mid_game = opens + Duration::minutes(20);
    engine.reconcile(room.id, mid_game).await?;
    for (user, score) in [(1u64, 1500u64), (2, 1200), (3, 800), (4, 500)] {
        engine.submit_score(room.id, UserId(user), score, mid_game).await?;
    }

    engine.reconcile(room.id, opens + Duration::hours(1)).await?;

    let stats = engine.get_stats(room.id).await?;
    tracing::info!(
        room_id = %stats.room_id,
        pool = %stats.total_prize_pool,
        fee = %stats.platform_fee_collected,
        "score contest settled"
    );
    for winner in &stats.winners {
        tracing::info!(
            position = winner.position,
            user_id = %winner.user_id,
            prize = %winner.prize_amount,
            "paid"
        );
    }
    Ok(())
}

/// Sunday: an 8-player single-elimination bracket. Matches are decided by a
/// shuffled coin here; the engine only cares who gets reported as winner.
async fn tournament(engine: &Engine<MemoryStore>, opens: DateTime<Utc>) -> Result<(), EngineError> {
    let mut config = RoomConfig::new(
        GameId(2),
        RoomKind::Tournament,
        opens,
        opens + Duration::hours(4),
    );
    config.max_players = 8;
    config.winner_split_rule = SplitRule::Top3;
    let room = engine.create_room(config).await?;

    let lobby = opens - Duration::minutes(3);
    for user in 10..=17 {
        engine.join_room(room.id, UserId(user), lobby).await?;
    }
    engine.reconcile(room.id, opens).await?;

    let bracket = engine
        .create_tournament(room.id, &TournamentConfig::default(), opens)
        .await?;
    tracing::info!(rounds = bracket.total_rounds, matches = bracket.matches.len(), "bracket ready");

    let mut now = opens + Duration::minutes(10);
    for round in 1..=bracket.total_rounds {
        let view = engine.get_bracket(room.id).await?;
        let matches = view.rounds[round as usize - 1].matches.clone();
        for m in matches {
            if m.status != MatchStatus::Pending {
                continue;
            }
            engine.start_match(m.id, now).await?;
            let winner = if rand::random::<bool>() { m.players[0] } else { m.players[1] };
            let winner = winner.or(m.players[0]).expect("started matches have players");
            engine.complete_match(m.id, winner, now + Duration::minutes(9)).await?;
        }
        now += Duration::minutes(30);
    }

    let stats = engine.get_stats(room.id).await?;
    tracing::info!(
        room_id = %stats.room_id,
        champion = %stats.winners[0].user_id,
        prize = %stats.winners[0].prize_amount,
        fee = %stats.platform_fee_collected,
        "tournament settled"
    );
    Ok(())
}
