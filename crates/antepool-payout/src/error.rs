//! Error types for the payout layer.

use antepool_store::StoreError;

/// Errors that can occur during prize distribution.
///
/// Guard losses are not errors here — they resolve to
/// [`DistributionOutcome::AlreadyHandled`](crate::DistributionOutcome) so the
/// racing caller sees an idempotent no-op. What remains is genuine store
/// failure on the primary write path.
#[derive(Debug, thiserror::Error)]
pub enum PayoutError {
    /// A primary write (participant, winner ledger, room finalization)
    /// failed. Leaderboard failures never surface here; they are logged and
    /// skipped.
    #[error(transparent)]
    Store(#[from] StoreError),
}
