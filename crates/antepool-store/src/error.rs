//! Error types for the store layer.

use antepool_types::{MatchId, RoomId, UserId};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The room does not exist.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// The match does not exist.
    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    /// No active participant for this (room, user) pair.
    #[error("no active participant {1} in room {0}")]
    ParticipantNotFound(RoomId, UserId),

    /// A conditional write observed different state than expected, or a
    /// uniqueness rule was violated. Whoever receives this lost a race.
    #[error("conflicting write: {0}")]
    Conflict(String),

    /// The backing store failed. Retryable at the caller's discretion.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether this error is a lost guard race rather than a hard failure.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}
