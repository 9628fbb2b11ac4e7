//! Periodic reconciliation sweeper.
//!
//! The engine is event-driven for user actions, but start/end boundaries and
//! match timeouts arrive with the clock. The [`Sweeper`] is the poll-style
//! trigger that turns wall time into engine calls: every interval it walks
//! the open rooms, times out overdue matches in running tournaments, and
//! reconciles each room's stored status against `now`.
//!
//! Every sweep is idempotent — reconcile and the timeout sweep both no-op on
//! rooms that need nothing — so running several sweepers against the same
//! store is safe; the store's conditional transitions pick the winners.
//!
//! # Integration
//!
//! ```ignore
//! let sweeper = Sweeper::new(store, rooms, tournaments, SweepConfig::default());
//! tokio::select! {
//!     _ = sweeper.run() => {}
//!     _ = shutdown_signal() => {}
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use antepool_room::{ReconcileOutcome, RoomService};
use antepool_store::Store;
use antepool_tournament::TournamentService;
use antepool_types::RoomStatus;
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Sweeper settings.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Time between sweeps.
    pub interval: Duration,
    /// Random delay (0–max ms) before the first sweep, so sweepers created
    /// at the same instant don't all hit the store together.
    pub initial_jitter_ms: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            initial_jitter_ms: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// Reports and counters
// ---------------------------------------------------------------------------

/// What a single sweep accomplished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Rooms whose status changed (started, finalized, or auto-cancelled).
    pub rooms_changed: usize,
    /// Rooms that reached completed this sweep.
    pub rooms_finalized: usize,
    /// Matches resolved by timeout this sweep.
    pub matches_timed_out: usize,
    /// Rooms that errored; logged and skipped, never fatal to the sweep.
    pub errors: usize,
}

/// Counters accumulated across the sweeper's lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepStats {
    pub sweeps: u64,
    pub rooms_changed: u64,
    pub rooms_finalized: u64,
    pub matches_timed_out: u64,
    pub errors: u64,
}

// ---------------------------------------------------------------------------
// Sweeper
// ---------------------------------------------------------------------------

/// Walks open rooms on an interval and applies time-driven transitions.
pub struct Sweeper<S> {
    store: Arc<S>,
    rooms: Arc<RoomService<S>>,
    tournaments: Arc<TournamentService<S>>,
    config: SweepConfig,
    stats: SweepStats,
}

impl<S: Store> Sweeper<S> {
    pub fn new(
        store: Arc<S>,
        rooms: Arc<RoomService<S>>,
        tournaments: Arc<TournamentService<S>>,
        config: SweepConfig,
    ) -> Sweeper<S> {
        Sweeper {
            store,
            rooms,
            tournaments,
            config,
            stats: SweepStats::default(),
        }
    }

    /// One pass over every open room at the given instant. Per-room failures
    /// are logged and counted, never propagated — one broken room must not
    /// stall the rest of the fleet.
    pub async fn sweep_once(&mut self, now: DateTime<Utc>) -> SweepReport {
        let mut report = SweepReport::default();

        let open_rooms = match self.store.list_open_rooms().await {
            Ok(rooms) => rooms,
            Err(err) => {
                warn!(error = %err, "sweep could not list open rooms");
                report.errors += 1;
                self.accumulate(&report);
                return report;
            }
        };

        for room in open_rooms {
            if room.is_tournament() && room.has_bracket() && room.status == RoomStatus::Ongoing {
                match self.tournaments.timeout_due_matches(room.id, now).await {
                    Ok(count) => report.matches_timed_out += count,
                    Err(err) => {
                        warn!(room_id = %room.id, error = %err, "timeout sweep failed");
                        report.errors += 1;
                    }
                }
            }

            match self.rooms.reconcile(room.id, now).await {
                Ok(ReconcileOutcome::Unchanged) => {}
                Ok(ReconcileOutcome::Finalized) => {
                    report.rooms_changed += 1;
                    report.rooms_finalized += 1;
                }
                Ok(_) => report.rooms_changed += 1,
                Err(err) => {
                    warn!(room_id = %room.id, error = %err, "reconcile failed");
                    report.errors += 1;
                }
            }
        }

        debug!(
            rooms_changed = report.rooms_changed,
            rooms_finalized = report.rooms_finalized,
            matches_timed_out = report.matches_timed_out,
            errors = report.errors,
            "sweep complete"
        );
        self.accumulate(&report);
        report
    }

    /// Sweeps forever at the configured interval. The first sweep is jittered
    /// so co-created sweepers desynchronize.
    pub async fn run(mut self) {
        if self.config.initial_jitter_ms > 0 {
            let jitter = rand::rng().random_range(0..self.config.initial_jitter_ms);
            tokio::time::sleep(Duration::from_millis(jitter)).await;
        }

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.sweep_once(Utc::now()).await;
        }
    }

    /// Lifetime counters.
    pub fn stats(&self) -> &SweepStats {
        &self.stats
    }

    fn accumulate(&mut self, report: &SweepReport) {
        self.stats.sweeps += 1;
        self.stats.rooms_changed += report.rooms_changed as u64;
        self.stats.rooms_finalized += report.rooms_finalized as u64;
        self.stats.matches_timed_out += report.matches_timed_out as u64;
        self.stats.errors += report.errors as u64;
    }
}
