//! Pure status derivation: what a room's status *should* be at an instant.

use antepool_types::{Room, RoomStatus};
use chrono::{DateTime, Utc};

/// Derives the room status implied by the clock.
///
/// Terminal statuses are fixed points; `Finalizing` is returned unchanged
/// because it is owned by whichever caller holds the distribution guard.
/// For everything else only the window matters:
///
/// - `now < start_time` → waiting
/// - `start_time <= now < end_time` → ongoing
/// - `now >= end_time` → completed
///
/// [`RoomService::reconcile`](crate::RoomService::reconcile) persists the
/// difference between this derivation and the stored status; player-count
/// rules (auto-cancel below the minimum) apply there, at the transition.
pub fn effective_status(room: &Room, now: DateTime<Utc>) -> RoomStatus {
    match room.status {
        RoomStatus::Completed | RoomStatus::Cancelled | RoomStatus::Finalizing => room.status,
        RoomStatus::Waiting | RoomStatus::Ongoing => {
            if now < room.start_time {
                RoomStatus::Waiting
            } else if now < room.end_time {
                RoomStatus::Ongoing
            } else {
                RoomStatus::Completed
            }
        }
    }
}
