//! Worker tasks that back the runtime orchestration.
//!
//! The spawner feeds the queue in the background, the arena loop drains it
//! one battle at a time, and the observer worker fans events out to
//! registered observers.

mod arena;
mod battle;
mod metrics;
mod observer;
mod spawner;

pub use arena::{ArenaExit, ArenaOutcome, ArenaWorker};
pub use battle::CombatLock;
pub use metrics::{ArenaMetrics, MetricsSnapshot};
pub use observer::ObserverWorker;
pub use spawner::SpawnerWorker;
