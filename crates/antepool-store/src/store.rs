//! The `Store` trait — the persistence seam the engine is written against.

use antepool_types::{
    LeaderboardEntry, LeaderboardKey, MatchId, MatchStatus, Participant, Room, RoomId, RoomStatus,
    TournamentMatch, UserId, WinnerRecord,
};

use crate::StoreError;

/// Persistence operations the engine needs.
///
/// Implementations must make each method atomic on its own; the engine
/// composes them and relies on the two `transition_*` methods for any
/// cross-call serialization. No method may block indefinitely.
pub trait Store: Send + Sync {
    // -- Rooms --

    /// Persists a new room. Fails with [`StoreError::Conflict`] if the id is
    /// already taken.
    async fn insert_room(&self, room: Room) -> Result<(), StoreError>;

    async fn get_room(&self, id: RoomId) -> Result<Room, StoreError>;

    /// Unconditional write of every room field. Callers that need
    /// serialization must hold a guard state won via
    /// [`transition_room_status`](Self::transition_room_status) first.
    async fn update_room(&self, room: &Room) -> Result<(), StoreError>;

    /// Conditional status transition: succeeds and returns the updated room
    /// only if the stored status equals `from`; otherwise fails with
    /// [`StoreError::Conflict`] and changes nothing. This is the room-level
    /// guard for finalization and for the cancel-vs-start race.
    async fn transition_room_status(
        &self,
        id: RoomId,
        from: RoomStatus,
        to: RoomStatus,
    ) -> Result<Room, StoreError>;

    /// Conditional round advance: bumps `current_round` from `from_round` to
    /// `to_round` only if the stored value equals `from_round`; otherwise
    /// fails with [`StoreError::Conflict`]. Serializes concurrent
    /// round-advancement attempts the way
    /// [`transition_room_status`](Self::transition_room_status) serializes
    /// status changes.
    async fn advance_room_round(
        &self,
        id: RoomId,
        from_round: u32,
        to_round: u32,
    ) -> Result<Room, StoreError>;

    /// All rooms not yet in a terminal status, for the reconcile sweep.
    async fn list_open_rooms(&self) -> Result<Vec<Room>, StoreError>;

    // -- Participants --

    /// Persists a new participant row. Fails with [`StoreError::Conflict`]
    /// if an active row already exists for the (room, user) pair.
    async fn insert_participant(&self, participant: Participant) -> Result<(), StoreError>;

    /// The active participant row for (room, user).
    async fn get_participant(&self, room: RoomId, user: UserId) -> Result<Participant, StoreError>;

    async fn update_participant(&self, participant: &Participant) -> Result<(), StoreError>;

    /// Active participants in join order (the bracket seeding order).
    async fn list_active_participants(&self, room: RoomId) -> Result<Vec<Participant>, StoreError>;

    // -- Winner ledger --

    /// Appends a winner row. Fails with [`StoreError::Conflict`] if the
    /// (room, position) pair already has one — the ledger is append-only and
    /// duplicate-free.
    async fn insert_winner_record(&self, record: WinnerRecord) -> Result<(), StoreError>;

    /// Winner rows for a room, ordered by position.
    async fn list_winner_records(&self, room: RoomId) -> Result<Vec<WinnerRecord>, StoreError>;

    // -- Leaderboards --

    async fn get_leaderboard_entry(
        &self,
        key: &LeaderboardKey,
    ) -> Result<Option<LeaderboardEntry>, StoreError>;

    async fn upsert_leaderboard_entry(&self, entry: LeaderboardEntry) -> Result<(), StoreError>;

    // -- Tournament matches --

    /// Persists a freshly generated bracket, all-or-nothing. Fails with
    /// [`StoreError::Conflict`] if the room already has matches, which
    /// guards against double bracket generation.
    async fn insert_matches(
        &self,
        room: RoomId,
        matches: Vec<TournamentMatch>,
    ) -> Result<(), StoreError>;

    async fn get_match(&self, id: MatchId) -> Result<TournamentMatch, StoreError>;

    /// Unconditional write of every match field; callers hold the status
    /// won via [`transition_match_status`](Self::transition_match_status).
    async fn update_match(&self, tournament_match: &TournamentMatch) -> Result<(), StoreError>;

    /// Conditional per-match status transition, same contract as
    /// [`transition_room_status`](Self::transition_room_status). Makes
    /// pending→active a single-writer operation.
    async fn transition_match_status(
        &self,
        id: MatchId,
        from: MatchStatus,
        to: MatchStatus,
    ) -> Result<TournamentMatch, StoreError>;

    /// Every match in a room, ordered by match number.
    async fn list_matches(&self, room: RoomId) -> Result<Vec<TournamentMatch>, StoreError>;

    /// Matches for one round, ordered by match number.
    async fn list_matches_by_round(
        &self,
        room: RoomId,
        round: u32,
    ) -> Result<Vec<TournamentMatch>, StoreError>;
}
