/// Battle tuning shared by the resolver and the runtime.
///
/// The stalemate guards exist because two entities that cannot damage each other
/// would otherwise trade "no effect" attacks forever. Disabling both reproduces
/// that behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleRules {
    /// Health restored to the hero after every won battle. Unclamped.
    pub heal_on_victory: i32,
    /// Rounds after which an unfinished battle is declared a draw.
    /// `None` removes the cap.
    pub max_rounds: Option<u32>,
    /// End the battle as a draw as soon as neither side can deal damage.
    pub detect_stalemate: bool,
}

impl BattleRules {
    // ===== bonus rules =====
    /// Roll (out of 100) under which a hero attack is a critical strike.
    pub const CRITICAL_CHANCE: u32 = 20;
    pub const CRITICAL_MULTIPLIER: i32 = 2;
    /// Roll (out of 100) under which a monster attack is poisonous.
    pub const POISON_CHANCE: u32 = 30;
    pub const POISON_DAMAGE: i32 = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HEAL_ON_VICTORY: i32 = 20;
    pub const DEFAULT_MAX_ROUNDS: u32 = 100;

    pub fn new() -> Self {
        Self {
            heal_on_victory: Self::DEFAULT_HEAL_ON_VICTORY,
            max_rounds: Some(Self::DEFAULT_MAX_ROUNDS),
            detect_stalemate: true,
        }
    }

    /// Rules with every stalemate guard removed.
    pub fn unguarded() -> Self {
        Self {
            max_rounds: None,
            detect_stalemate: false,
            ..Self::new()
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: Option<u32>) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_stalemate_detection(mut self, enabled: bool) -> Self {
        self.detect_stalemate = enabled;
        self
    }
}

impl Default for BattleRules {
    fn default() -> Self {
        Self::new()
    }
}

/// Blueprint the spawner stamps monsters from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterTemplate {
    /// Name prefix; spawned monsters are called `<base_name>_<suffix>`.
    pub base_name: String,
    pub health: i32,
    pub attack: i32,
    pub defense: i32,
}

impl MonsterTemplate {
    pub const DEFAULT_BASE_NAME: &'static str = "Goblin";
    pub const DEFAULT_HEALTH: i32 = 50;
    pub const DEFAULT_ATTACK: i32 = 15;
    pub const DEFAULT_DEFENSE: i32 = 5;
    /// Name suffixes are drawn from `0..NAME_SUFFIX_RANGE`.
    pub const NAME_SUFFIX_RANGE: u32 = 1000;

    /// Formats the name for a given suffix.
    pub fn name_for(&self, suffix: u32) -> String {
        format!("{}_{}", self.base_name, suffix)
    }
}

impl Default for MonsterTemplate {
    fn default() -> Self {
        Self {
            base_name: Self::DEFAULT_BASE_NAME.to_owned(),
            health: Self::DEFAULT_HEALTH,
            attack: Self::DEFAULT_ATTACK,
            defense: Self::DEFAULT_DEFENSE,
        }
    }
}
