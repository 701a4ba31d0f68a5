//! Arena metrics and statistics.
//!
//! Tracks spawn throughput, battle results and queue pressure.

use std::sync::atomic::{AtomicU64, Ordering};

use arena_core::BattleOutcome;

/// Counters shared by the spawner, the arena loop and battle tasks.
///
/// Uses atomics for lock-free access across tasks.
#[derive(Debug, Default)]
pub struct ArenaMetrics {
    /// Monsters enqueued by the spawner
    spawned: AtomicU64,

    battles_won: AtomicU64,
    battles_lost: AtomicU64,
    battles_drawn: AtomicU64,

    /// Rounds with at least one attack, across all battles
    rounds: AtomicU64,

    /// Monsters waiting at the last queue update
    queue_depth: AtomicU64,

    /// Peak queue depth observed
    peak_queue_depth: AtomicU64,
}

impl ArenaMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_spawn(&self, queue_depth: usize) {
        self.spawned.fetch_add(1, Ordering::Relaxed);
        self.set_queue_depth(queue_depth as u64);
    }

    pub fn record_round(&self) {
        self.rounds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_battle(&self, outcome: BattleOutcome) {
        let counter = match outcome {
            BattleOutcome::HeroWins => &self.battles_won,
            BattleOutcome::MonsterWins => &self.battles_lost,
            BattleOutcome::Draw(_) => &self.battles_drawn,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Updates queue depth and tracks peak.
    pub fn set_queue_depth(&self, depth: u64) {
        self.queue_depth.store(depth, Ordering::Relaxed);

        // Update peak using compare-and-swap loop
        let mut current_peak = self.peak_queue_depth.load(Ordering::Relaxed);
        while depth > current_peak {
            match self.peak_queue_depth.compare_exchange_weak(
                current_peak,
                depth,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current_peak = actual,
            }
        }
    }

    pub fn spawned(&self) -> u64 {
        self.spawned.load(Ordering::Relaxed)
    }

    pub fn battles(&self) -> u64 {
        self.battles_won.load(Ordering::Relaxed)
            + self.battles_lost.load(Ordering::Relaxed)
            + self.battles_drawn.load(Ordering::Relaxed)
    }

    /// Creates a snapshot of all metrics for display/logging.
    ///
    /// Note: individual fields are read atomically but the snapshot as a whole
    /// may be inconsistent if metrics are being updated concurrently.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            spawned: self.spawned(),
            battles_won: self.battles_won.load(Ordering::Relaxed),
            battles_lost: self.battles_lost.load(Ordering::Relaxed),
            battles_drawn: self.battles_drawn.load(Ordering::Relaxed),
            rounds: self.rounds.load(Ordering::Relaxed),
            queue_depth: self.queue_depth.load(Ordering::Relaxed),
            peak_queue_depth: self.peak_queue_depth.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub spawned: u64,
    pub battles_won: u64,
    pub battles_lost: u64,
    pub battles_drawn: u64,
    pub rounds: u64,
    pub queue_depth: u64,
    pub peak_queue_depth: u64,
}

impl MetricsSnapshot {
    pub fn battles(&self) -> u64 {
        self.battles_won + self.battles_lost + self.battles_drawn
    }
}
