//! In-memory store: the reference `Store` implementation.
//!
//! All state sits behind one async mutex, which makes every method — the
//! conditional transitions included — trivially atomic. Good for tests and
//! single-node deployments; a database-backed implementation would map the
//! conditional transitions onto conditional updates.

use std::collections::HashMap;

use antepool_types::{
    LeaderboardEntry, LeaderboardKey, MatchId, MatchStatus, Participant, Room, RoomId, RoomStatus,
    TournamentMatch, UserId, WinnerRecord,
};
use tokio::sync::Mutex;

use crate::{Store, StoreError};

#[derive(Default)]
struct Inner {
    rooms: HashMap<RoomId, Room>,
    /// Participant rows in insertion (join) order. Soft-removed rows stay.
    participants: Vec<Participant>,
    winner_records: Vec<WinnerRecord>,
    leaderboard: HashMap<LeaderboardKey, LeaderboardEntry>,
    matches: HashMap<MatchId, TournamentMatch>,
}

/// A `Store` backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl Store for MemoryStore {
    async fn insert_room(&self, room: Room) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.rooms.contains_key(&room.id) {
            return Err(StoreError::Conflict(format!("room {} already exists", room.id)));
        }
        inner.rooms.insert(room.id, room);
        Ok(())
    }

    async fn get_room(&self, id: RoomId) -> Result<Room, StoreError> {
        let inner = self.inner.lock().await;
        inner.rooms.get(&id).cloned().ok_or(StoreError::RoomNotFound(id))
    }

    async fn update_room(&self, room: &Room) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        match inner.rooms.get_mut(&room.id) {
            Some(stored) => {
                *stored = room.clone();
                Ok(())
            }
            None => Err(StoreError::RoomNotFound(room.id)),
        }
    }

    async fn transition_room_status(
        &self,
        id: RoomId,
        from: RoomStatus,
        to: RoomStatus,
    ) -> Result<Room, StoreError> {
        let mut inner = self.inner.lock().await;
        let room = inner.rooms.get_mut(&id).ok_or(StoreError::RoomNotFound(id))?;
        if room.status != from {
            return Err(StoreError::Conflict(format!(
                "room {id} is {}, expected {from}",
                room.status
            )));
        }
        room.status = to;
        Ok(room.clone())
    }

    async fn advance_room_round(
        &self,
        id: RoomId,
        from_round: u32,
        to_round: u32,
    ) -> Result<Room, StoreError> {
        let mut inner = self.inner.lock().await;
        let room = inner.rooms.get_mut(&id).ok_or(StoreError::RoomNotFound(id))?;
        if room.current_round != from_round {
            return Err(StoreError::Conflict(format!(
                "room {id} is at round {}, expected {from_round}",
                room.current_round
            )));
        }
        room.current_round = to_round;
        Ok(room.clone())
    }

    async fn list_open_rooms(&self) -> Result<Vec<Room>, StoreError> {
        let inner = self.inner.lock().await;
        let mut rooms: Vec<Room> = inner
            .rooms
            .values()
            .filter(|room| !room.status.is_terminal())
            .cloned()
            .collect();
        rooms.sort_by_key(|room| room.id);
        Ok(rooms)
    }

    async fn insert_participant(&self, participant: Participant) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let duplicate = inner.participants.iter().any(|row| {
            row.room_id == participant.room_id
                && row.user_id == participant.user_id
                && row.is_active
        });
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "user {} already active in room {}",
                participant.user_id, participant.room_id
            )));
        }
        inner.participants.push(participant);
        Ok(())
    }

    async fn get_participant(&self, room: RoomId, user: UserId) -> Result<Participant, StoreError> {
        let inner = self.inner.lock().await;
        inner
            .participants
            .iter()
            .find(|row| row.room_id == room && row.user_id == user && row.is_active)
            .cloned()
            .ok_or(StoreError::ParticipantNotFound(room, user))
    }

    async fn update_participant(&self, participant: &Participant) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        // Prefer the active row; a soft-remove update (is_active being
        // cleared) still targets the row that was active when read.
        let index = inner
            .participants
            .iter()
            .position(|row| {
                row.room_id == participant.room_id
                    && row.user_id == participant.user_id
                    && row.is_active
            })
            .or_else(|| {
                inner.participants.iter().rposition(|row| {
                    row.room_id == participant.room_id && row.user_id == participant.user_id
                })
            })
            .ok_or(StoreError::ParticipantNotFound(
                participant.room_id,
                participant.user_id,
            ))?;
        inner.participants[index] = participant.clone();
        Ok(())
    }

    async fn list_active_participants(&self, room: RoomId) -> Result<Vec<Participant>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .participants
            .iter()
            .filter(|row| row.room_id == room && row.is_active)
            .cloned()
            .collect())
    }

    async fn insert_winner_record(&self, record: WinnerRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let duplicate = inner
            .winner_records
            .iter()
            .any(|row| row.room_id == record.room_id && row.position == record.position);
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "room {} already has a winner at position {}",
                record.room_id, record.position
            )));
        }
        inner.winner_records.push(record);
        Ok(())
    }

    async fn list_winner_records(&self, room: RoomId) -> Result<Vec<WinnerRecord>, StoreError> {
        let inner = self.inner.lock().await;
        let mut records: Vec<WinnerRecord> = inner
            .winner_records
            .iter()
            .filter(|row| row.room_id == room)
            .cloned()
            .collect();
        records.sort_by_key(|row| row.position);
        Ok(records)
    }

    async fn get_leaderboard_entry(
        &self,
        key: &LeaderboardKey,
    ) -> Result<Option<LeaderboardEntry>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.leaderboard.get(key).cloned())
    }

    async fn upsert_leaderboard_entry(&self, entry: LeaderboardEntry) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.leaderboard.insert(entry.key.clone(), entry);
        Ok(())
    }

    async fn insert_matches(
        &self,
        room: RoomId,
        matches: Vec<TournamentMatch>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.matches.values().any(|m| m.room_id == room) {
            return Err(StoreError::Conflict(format!("room {room} already has a bracket")));
        }
        for m in matches {
            inner.matches.insert(m.id, m);
        }
        Ok(())
    }

    async fn get_match(&self, id: MatchId) -> Result<TournamentMatch, StoreError> {
        let inner = self.inner.lock().await;
        inner.matches.get(&id).cloned().ok_or(StoreError::MatchNotFound(id))
    }

    async fn update_match(&self, tournament_match: &TournamentMatch) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        match inner.matches.get_mut(&tournament_match.id) {
            Some(stored) => {
                *stored = tournament_match.clone();
                Ok(())
            }
            None => Err(StoreError::MatchNotFound(tournament_match.id)),
        }
    }

    async fn transition_match_status(
        &self,
        id: MatchId,
        from: MatchStatus,
        to: MatchStatus,
    ) -> Result<TournamentMatch, StoreError> {
        let mut inner = self.inner.lock().await;
        let m = inner.matches.get_mut(&id).ok_or(StoreError::MatchNotFound(id))?;
        if m.status != from {
            return Err(StoreError::Conflict(format!(
                "match {id} is {}, expected {from}",
                m.status
            )));
        }
        m.status = to;
        Ok(m.clone())
    }

    async fn list_matches(&self, room: RoomId) -> Result<Vec<TournamentMatch>, StoreError> {
        let inner = self.inner.lock().await;
        let mut matches: Vec<TournamentMatch> = inner
            .matches
            .values()
            .filter(|m| m.room_id == room)
            .cloned()
            .collect();
        matches.sort_by_key(|m| m.match_number);
        Ok(matches)
    }

    async fn list_matches_by_round(
        &self,
        room: RoomId,
        round: u32,
    ) -> Result<Vec<TournamentMatch>, StoreError> {
        let inner = self.inner.lock().await;
        let mut matches: Vec<TournamentMatch> = inner
            .matches
            .values()
            .filter(|m| m.room_id == room && m.round == round)
            .cloned()
            .collect();
        matches.sort_by_key(|m| m.match_number);
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use antepool_types::{Amount, Currency, GameId, RoomKind, SplitRule};
    use chrono::{TimeZone, Utc};

    use super::*;

    fn room(id: u64) -> Room {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap();
        Room {
            id: RoomId(id),
            game_id: GameId(1),
            kind: RoomKind::ScoreContest,
            status: RoomStatus::Waiting,
            start_time: start,
            end_time: start + chrono::Duration::hours(1),
            actual_start_time: None,
            actual_end_time: None,
            max_players: 8,
            min_players_to_start: 2,
            current_players: 0,
            entry_fee: Amount::from_major(10),
            currency: Currency::usd(),
            total_prize_pool: Amount::ZERO,
            platform_fee_collected: Amount::ZERO,
            winner_split_rule: SplitRule::Top3,
            is_sponsored: false,
            current_round: 0,
            tournament_rounds: 0,
        }
    }

    #[tokio::test]
    async fn test_transition_room_status_is_conditional() {
        let store = MemoryStore::new();
        store.insert_room(room(1)).await.unwrap();

        let updated = store
            .transition_room_status(RoomId(1), RoomStatus::Waiting, RoomStatus::Ongoing)
            .await
            .unwrap();
        assert_eq!(updated.status, RoomStatus::Ongoing);

        // Second caller expecting Waiting loses the race.
        let err = store
            .transition_room_status(RoomId(1), RoomStatus::Waiting, RoomStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_duplicate_active_participant_rejected() {
        let store = MemoryStore::new();
        store.insert_room(room(1)).await.unwrap();
        let now = Utc::now();

        store
            .insert_participant(Participant::new(RoomId(1), UserId(7), now))
            .await
            .unwrap();
        let err = store
            .insert_participant(Participant::new(RoomId(1), UserId(7), now))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // Soft-remove, then rejoin is allowed.
        let mut p = store.get_participant(RoomId(1), UserId(7)).await.unwrap();
        p.is_active = false;
        store.update_participant(&p).await.unwrap();
        store
            .insert_participant(Participant::new(RoomId(1), UserId(7), now))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_winner_ledger_is_duplicate_free() {
        let store = MemoryStore::new();
        let record = WinnerRecord {
            room_id: RoomId(1),
            user_id: UserId(2),
            position: 1,
            prize_percentage: 100,
            prize_amount: Amount::from_major(9),
            recorded_at: Utc::now(),
        };
        store.insert_winner_record(record.clone()).await.unwrap();
        let err = store.insert_winner_record(record).await.unwrap_err();
        assert!(err.is_conflict());
    }
}
