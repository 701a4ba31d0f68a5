//! Combat resolution.
//!
//! - [`resolve_attack`]: one attack, base damage plus the attacker's kind bonus
//! - [`Battle`]: round-by-round state machine between the hero and one monster
//! - [`fight`]: runs a battle to completion without pacing
//!
//! Pacing and the round lock belong to the caller; [`Battle::play_round`] is the
//! unit the runtime executes while holding the combat lock.

mod attack;
mod battle;

pub use attack::{AttackOutcome, base_damage, resolve_attack};
pub use battle::{Battle, BattleOutcome, BattleReport, BattleState, DrawReason, RoundReport, fight};
