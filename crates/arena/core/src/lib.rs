//! Combat rules and data types for the battle arena.
//!
//! `arena-core` defines the canonical rules (entities, kind bonuses, attack
//! resolution, the battle state machine) as synchronous, side-effect free APIs.
//! Scheduling, locking and event publication live in the `runtime` crate, which
//! drives these types one round at a time.
pub mod combat;
pub mod config;
pub mod entity;
pub mod rng;

pub use combat::{
    AttackOutcome, Battle, BattleOutcome, BattleReport, BattleState, DrawReason, RoundReport,
    fight,
};
pub use config::{BattleRules, MonsterTemplate};
pub use entity::{DamageBonus, Entity, EntityError, EntityId, EntityKind, Stat};
pub use rng::{Roller, ScriptedRoller, SeededRoller, compute_seed};
