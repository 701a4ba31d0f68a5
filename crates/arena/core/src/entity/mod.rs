//! Combatants: identity plus mutable combat attributes.
//!
//! An [`Entity`] does not synchronize itself. The runtime wraps the shared hero
//! in a lock and hands monsters to exactly one battle at a time.

mod kind;

use std::fmt;

use thiserror::Error;

use crate::combat::{AttackOutcome, resolve_attack};
use crate::rng::Roller;

pub use kind::{DamageBonus, EntityKind};

/// Unique identifier for a combatant within one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u64);

impl EntityId {
    /// Reserved identifier for the hero.
    pub const HERO: Self = Self(0);

    /// First identifier handed to a spawned monster.
    pub const FIRST_MONSTER: Self = Self(1);

    /// Identifier following this one.
    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Attribute named by a construction error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stat {
    Attack,
    Defense,
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stat::Attack => "attack",
            Stat::Defense => "defense",
        };
        f.write_str(label)
    }
}

/// Rejected entity construction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EntityError {
    #[error("entity name must not be empty")]
    EmptyName,

    #[error("{stat} must be non-negative, got {value}")]
    NegativeStat { stat: Stat, value: i32 },
}

/// A combatant in the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    id: EntityId,
    name: String,
    kind: EntityKind,
    health: i32,
    attack: i32,
    defense: i32,
}

impl Entity {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        kind: EntityKind,
        health: i32,
        attack: i32,
        defense: i32,
    ) -> Result<Self, EntityError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EntityError::EmptyName);
        }
        if attack < 0 {
            return Err(EntityError::NegativeStat {
                stat: Stat::Attack,
                value: attack,
            });
        }
        if defense < 0 {
            return Err(EntityError::NegativeStat {
                stat: Stat::Defense,
                value: defense,
            });
        }

        Ok(Self {
            id,
            name,
            kind,
            health,
            attack,
            defense,
        })
    }

    /// Builds the hero under the reserved [`EntityId::HERO`].
    pub fn hero(
        name: impl Into<String>,
        health: i32,
        attack: i32,
        defense: i32,
    ) -> Result<Self, EntityError> {
        Self::new(EntityId::HERO, name, EntityKind::Hero, health, attack, defense)
    }

    pub fn monster(
        id: EntityId,
        name: impl Into<String>,
        health: i32,
        attack: i32,
        defense: i32,
    ) -> Result<Self, EntityError> {
        Self::new(id, name, EntityKind::Monster, health, attack, defense)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn attack_power(&self) -> i32 {
        self.attack
    }

    pub fn defense(&self) -> i32 {
        self.defense
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Whether an attack from `self` would change `defender`'s health.
    pub fn can_damage(&self, defender: &Entity) -> bool {
        self.attack > defender.defense
    }

    /// Adds health with no upper bound other than `i32::MAX`.
    pub fn heal(&mut self, amount: i32) {
        self.health = self.health.saturating_add(amount);
    }

    /// Removes health. The result may go below zero.
    pub fn take_damage(&mut self, damage: i32) {
        self.health = self.health.saturating_sub(damage);
    }

    /// Attacks `defender`, applying any damage in place.
    ///
    /// Draws from `roller` only when the base damage is positive.
    pub fn attack(
        &self,
        defender: &mut Entity,
        roller: &mut (impl Roller + ?Sized),
    ) -> AttackOutcome {
        let outcome = resolve_attack(self.kind, self.attack, defender.defense, roller);
        if let AttackOutcome::Hit { damage, .. } = outcome {
            defender.take_damage(damage);
        }
        outcome
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}, HP: {}, Attack: {}, Defense: {}",
            self.kind, self.name, self.health, self.attack, self.defense
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRoller;

    fn goblin() -> Entity {
        Entity::monster(EntityId(1), "Goblin_1", 50, 15, 5).unwrap()
    }

    #[test]
    fn rejects_invalid_construction() {
        assert_eq!(Entity::hero("  ", 10, 1, 1), Err(EntityError::EmptyName));
        assert_eq!(
            Entity::hero("Hero", 10, -1, 1),
            Err(EntityError::NegativeStat {
                stat: Stat::Attack,
                value: -1
            })
        );
        assert_eq!(
            Entity::monster(EntityId(3), "Rat", 10, 1, -4),
            Err(EntityError::NegativeStat {
                stat: Stat::Defense,
                value: -4
            })
        );
    }

    #[test]
    fn alive_iff_positive_health() {
        let mut hero = Entity::hero("Hero", 1, 20, 10).unwrap();
        assert!(hero.is_alive());
        hero.take_damage(1);
        assert!(!hero.is_alive());
        hero.take_damage(7);
        assert_eq!(hero.health(), -7);
        hero.heal(8);
        assert!(hero.is_alive());
    }

    #[test]
    fn heal_is_unclamped() {
        let mut hero = Entity::hero("Hero", 100, 20, 10).unwrap();
        hero.heal(20);
        hero.heal(1_000);
        assert_eq!(hero.health(), 1_120);
    }

    #[test]
    fn health_saturates_at_the_limits() {
        let mut hero = Entity::hero("Hero", i32::MAX, 20, 10).unwrap();
        hero.heal(20);
        assert_eq!(hero.health(), i32::MAX);

        hero.take_damage(i32::MAX);
        hero.take_damage(i32::MAX);
        assert_eq!(hero.health(), -i32::MAX);
        hero.take_damage(1);
        hero.take_damage(1);
        assert_eq!(hero.health(), i32::MIN);
    }

    #[test]
    fn critical_hit_with_huge_attack_saturates() {
        let hero = Entity::hero("Hero", 100, i32::MAX, 0).unwrap();
        let mut target = goblin();
        let outcome = hero.attack(&mut target, &mut ScriptedRoller::new(vec![0]));

        assert_eq!(
            outcome,
            AttackOutcome::Hit {
                damage: i32::MAX,
                bonus: Some(DamageBonus::Critical)
            }
        );
        assert!(!target.is_alive());
    }

    #[test]
    fn blocked_attack_changes_nothing_and_skips_the_roll() {
        let weak = Entity::hero("Hero", 20, 5, 10).unwrap();
        let mut target = goblin();
        let mut roller = ScriptedRoller::new(vec![0]);

        let outcome = weak.attack(&mut target, &mut roller);

        assert_eq!(outcome, AttackOutcome::NoEffect);
        assert_eq!(target.health(), 50);
        assert_eq!(roller.draws(), 0);
    }

    #[test]
    fn hero_critical_doubles_damage() {
        let hero = Entity::hero("Hero", 100, 20, 10).unwrap();
        let mut target = goblin();
        let outcome = hero.attack(&mut target, &mut ScriptedRoller::new(vec![3]));

        assert_eq!(
            outcome,
            AttackOutcome::Hit {
                damage: 30,
                bonus: Some(DamageBonus::Critical)
            }
        );
        assert_eq!(target.health(), 20);
    }

    #[test]
    fn monster_poison_adds_flat_damage() {
        let monster = goblin();
        let mut hero = Entity::hero("Hero", 100, 20, 10).unwrap();
        let outcome = monster.attack(&mut hero, &mut ScriptedRoller::new(vec![10]));

        assert_eq!(
            outcome,
            AttackOutcome::Hit {
                damage: 10,
                bonus: Some(DamageBonus::Poison)
            }
        );
        assert_eq!(hero.health(), 90);
    }

    #[test]
    fn status_line_names_the_kind() {
        let hero = Entity::hero("Hero", 100, 20, 10).unwrap();
        assert_eq!(
            hero.to_string(),
            "Character: Hero, HP: 100, Attack: 20, Defense: 10"
        );
        assert_eq!(
            goblin().to_string(),
            "Monster: Goblin_1, HP: 50, Attack: 15, Defense: 5"
        );
    }
}
