//! Topic-based event bus for arena events.
//!
//! Workers publish structured events instead of printing prose; hosts subscribe
//! to the topics they need or register an [`crate::ArenaObserver`].

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{CombatEvent, Combatant, SpawnEvent, StatusEvent};
