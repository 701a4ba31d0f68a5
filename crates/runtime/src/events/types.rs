//! Event payloads, one enum per topic.

use serde::{Deserialize, Serialize};

use arena_core::{AttackOutcome, BattleOutcome, Entity, EntityId};

/// Identity of a combatant as carried in events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: EntityId,
    pub name: String,
}

impl Combatant {
    pub fn of(entity: &Entity) -> Self {
        Self {
            id: entity.id(),
            name: entity.name().to_owned(),
        }
    }
}

/// Spawner activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SpawnEvent {
    MonsterSpawned {
        monster: Entity,
        /// Queue length right after the enqueue.
        queue_len: usize,
    },
}

/// Battle narration. `battle` numbers battles from 1 in the order fought.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CombatEvent {
    BattleStarted {
        battle: u64,
        hero: Combatant,
        monster: Entity,
    },
    Attack {
        battle: u64,
        round: u32,
        attacker: Combatant,
        defender: Combatant,
        outcome: AttackOutcome,
        /// Defender health after the attack landed.
        defender_health: i32,
    },
    Defeated {
        battle: u64,
        combatant: Combatant,
    },
    Healed {
        battle: u64,
        hero: Combatant,
        amount: i32,
        health: i32,
    },
    BattleEnded {
        battle: u64,
        outcome: BattleOutcome,
        rounds: u32,
    },
}

/// Periodic and terminal reports from the arena loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StatusEvent {
    HeroStatus {
        hero: Entity,
        /// Monsters still waiting in the spawn queue.
        remaining: usize,
    },
    GameOver {
        hero: Entity,
        battles: u64,
    },
}
