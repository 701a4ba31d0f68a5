//! Entity kinds and their attack bonuses.

use std::fmt;

use crate::config::BattleRules;

/// Closed set of combatant kinds.
///
/// Each kind owns exactly one attack bonus, selected by [`EntityKind::bonus`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    /// The long-lived player character. Bonus: critical strike.
    Hero,
    /// Spawned opponent. Bonus: poison.
    Monster,
}

impl EntityKind {
    /// Bonus that fires for this kind on the given percentile roll, if any.
    pub const fn bonus(self, roll: u32) -> Option<DamageBonus> {
        match self {
            Self::Hero if roll < BattleRules::CRITICAL_CHANCE => Some(DamageBonus::Critical),
            Self::Monster if roll < BattleRules::POISON_CHANCE => Some(DamageBonus::Poison),
            _ => None,
        }
    }

    /// Label used by the status line.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hero => "Character",
            Self::Monster => "Monster",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Extra damage granted by a kind bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageBonus {
    /// Damage is multiplied by [`BattleRules::CRITICAL_MULTIPLIER`].
    Critical,
    /// Adds a flat [`BattleRules::POISON_DAMAGE`].
    Poison,
}

impl DamageBonus {
    /// Applies the bonus to an already positive base damage.
    pub const fn apply(self, damage: i32) -> i32 {
        match self {
            Self::Critical => damage.saturating_mul(BattleRules::CRITICAL_MULTIPLIER),
            Self::Poison => damage.saturating_add(BattleRules::POISON_DAMAGE),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical hit!",
            Self::Poison => "Poisonous attack!",
        }
    }
}
