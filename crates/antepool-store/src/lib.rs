//! Persistence abstraction for Antepool.
//!
//! The engine never talks to a database directly — everything goes through
//! the [`Store`] trait. Two guarantees matter beyond plain CRUD:
//!
//! - [`Store::transition_room_status`] and [`Store::transition_match_status`]
//!   are conditional (compare-and-swap) writes. They are the serialization
//!   points for room finalization, cancellation-vs-start races, and
//!   single-writer match transitions.
//! - [`Store::insert_winner_record`] enforces at most one row per
//!   (room, position), and [`Store::insert_matches`] is all-or-nothing per
//!   room.
//!
//! [`MemoryStore`] implements the contract under a single async lock; it
//! backs every test, the demo binary, and single-node deployments.

#![allow(async_fn_in_trait)]

mod error;
mod memory;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::Store;
