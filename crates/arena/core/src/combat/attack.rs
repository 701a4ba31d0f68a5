//! Single-attack resolution.

use crate::entity::{DamageBonus, EntityKind};
use crate::rng::Roller;

/// Result of one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    /// Attack did not exceed the defender's defense.
    NoEffect,
    /// Damage was dealt, possibly boosted by the attacker's kind bonus.
    Hit {
        damage: i32,
        bonus: Option<DamageBonus>,
    },
}

impl AttackOutcome {
    /// Damage dealt, zero for [`AttackOutcome::NoEffect`].
    pub const fn damage(&self) -> i32 {
        match self {
            Self::NoEffect => 0,
            Self::Hit { damage, .. } => *damage,
        }
    }
}

/// Damage before bonuses: `attack - defense`, possibly non-positive.
pub const fn base_damage(attack: i32, defense: i32) -> i32 {
    attack.saturating_sub(defense)
}

/// Resolve an attack by an attacker of `kind`.
///
/// # Formula
///
/// ```text
/// base = attack - defense
/// if base <= 0: no effect, no roll
/// roll = d100
/// Hero    and roll < 20: base * 2
/// Monster and roll < 30: base + 5
/// ```
pub fn resolve_attack(
    kind: EntityKind,
    attack: i32,
    defense: i32,
    roller: &mut (impl Roller + ?Sized),
) -> AttackOutcome {
    let base = base_damage(attack, defense);
    if base <= 0 {
        return AttackOutcome::NoEffect;
    }

    let bonus = kind.bonus(roller.roll_d100());
    let damage = bonus.map_or(base, |bonus| bonus.apply(base));

    AttackOutcome::Hit { damage, bonus }
}
