//! Unified error type for the engine facade.

use antepool_room::RoomError;
use antepool_store::StoreError;
use antepool_tournament::TournamentError;

/// Any failure an [`Engine`](crate::Engine) call can return.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Room(#[from] RoomError),

    #[error(transparent)]
    Tournament(#[from] TournamentError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
