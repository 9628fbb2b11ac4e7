//! Error types for the room layer.

use antepool_payout::PayoutError;
use antepool_store::StoreError;
use antepool_types::{RoomId, RoomStatus, UserId};

/// Errors that can occur during room operations.
///
/// Validation and state errors are returned synchronously and are never
/// retried automatically. Guard races on finalization never surface here —
/// the losing caller's reconcile reports an unchanged room instead.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// Room window is inverted or empty.
    #[error("invalid room window: start_time must precede end_time")]
    InvalidWindow,

    /// Player limits are inconsistent.
    #[error("invalid player limits: need 1 <= min <= max, got min {min}, max {max}")]
    InvalidPlayerLimits { min: u32, max: u32 },

    /// The room is not accepting joins (already started, finalizing, or
    /// terminal).
    #[error("room {0} is {1}, not accepting joins")]
    NotJoinable(RoomId, RoomStatus),

    /// No player slots left.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The user already has an active seat in this room.
    #[error("user {1} already joined room {0}")]
    AlreadyJoined(RoomId, UserId),

    /// Leaving is only possible while the room is waiting.
    #[error("room {0} already started, leaving is no longer possible")]
    LeaveAfterStart(RoomId),

    /// Scores are only accepted during the ongoing window.
    #[error("room {0} is {1}, not accepting scores")]
    NotAcceptingScores(RoomId, RoomStatus),

    /// Score submission targets a tournament room; tournament scores accrue
    /// from match wins only.
    #[error("room {0} is a tournament, scores accrue from match results")]
    NotAScoreContest(RoomId),

    /// Cancellation is only possible while waiting and before start_time.
    /// Also returned when a cancel loses the race against the start
    /// transition — by then the window has closed.
    #[error("room {0} can no longer be cancelled")]
    CancelWindowClosed(RoomId),

    /// The store rejected or failed an operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Finalization failed on its primary write path.
    #[error(transparent)]
    Payout(#[from] PayoutError),
}
