//! Runtime orchestration for the battle arena.
//!
//! This crate wires the pure rules from `arena-core` into concurrently running
//! tokio tasks. Consumers embed [`Runtime`] to start a run, observe it through
//! [`ArenaHandle`] or an [`ArenaObserver`], and stop it with
//! [`Runtime::shutdown`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`queue`] and [`hero`] are the shared resources the workers coordinate on
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod hero;
pub mod queue;
pub mod runtime;
pub mod shutdown;

mod workers;

pub use api::{ArenaHandle, ArenaObserver, Result, RuntimeError};
pub use events::{CombatEvent, Combatant, Event, EventBus, SpawnEvent, StatusEvent, Topic};
pub use hero::SharedHero;
pub use queue::SpawnQueue;
pub use runtime::{ArenaExit, RunSummary, Runtime, RuntimeBuilder, RuntimeConfig};
pub use shutdown::{Shutdown, ShutdownSignal};
pub use workers::{ArenaMetrics, MetricsSnapshot};
