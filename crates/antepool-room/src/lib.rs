//! Room lifecycle management for Antepool.
//!
//! A room's effective status is a pure function of time
//! ([`effective_status`]); [`RoomService`] persists the transitions that
//! function implies and handles the participant-facing operations (join,
//! leave, score submission, cancellation). Finalization is delegated to the
//! payout crate behind the room's conditional status guard.
//!
//! # Key types
//!
//! - [`RoomService`] — creates rooms, applies participant actions, reconciles
//! - [`RoomConfig`] — creation settings (window, limits, fee, split rule)
//! - [`effective_status`] — the time → status derivation
//! - [`ReconcileOutcome`] — what one reconcile pass did

mod config;
mod error;
mod service;
mod status;

pub use config::RoomConfig;
pub use error::RoomError;
pub use service::{ReconcileOutcome, RoomService};
pub use status::effective_status;
