//! Client configuration loaded from environment variables.
use std::env;
use std::time::Duration;

use arena_core::Entity;
use runtime::RuntimeConfig;

/// How events are written to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventFormat {
    /// Human-readable narration.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl std::str::FromStr for EventFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown event format: {other}")),
        }
    }
}

/// Stats for the hero the run starts with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeroConfig {
    pub name: String,
    pub health: i32,
    pub attack: i32,
    pub defense: i32,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            name: "Hero".to_owned(),
            health: 100,
            attack: 20,
            defense: 10,
        }
    }
}

impl HeroConfig {
    pub fn build(&self) -> anyhow::Result<Entity> {
        Ok(Entity::hero(
            self.name.clone(),
            self.health,
            self.attack,
            self.defense,
        )?)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ArenaConfig {
    pub hero: HeroConfig,
    pub runtime: RuntimeConfig,
    pub event_format: EventFormat,
}

impl ArenaConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_HERO_NAME`, `ARENA_HERO_HEALTH`, `ARENA_HERO_ATTACK`,
    ///   `ARENA_HERO_DEFENSE` - Hero stats (default: Hero, 100, 20, 10)
    /// - `ARENA_SPAWN_INTERVAL_MS` - Delay between spawns (default: 3000)
    /// - `ARENA_POLL_INTERVAL_MS` - Delay between queue polls (default: 1000)
    /// - `ARENA_ROUND_DELAY_MS` - Delay between battle rounds (default: 500)
    /// - `ARENA_MAX_ROUNDS` - Rounds before a draw, 0 disables (default: 100)
    /// - `ARENA_DETECT_STALEMATE` - Draw when nobody can deal damage (default: true)
    /// - `ARENA_SEED` - Fixed seed for reproducible runs (default: random)
    /// - `ARENA_EVENT_FORMAT` - `text` or `json` (default: text)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ArenaConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(name) = lookup("ARENA_HERO_NAME").filter(|name| !name.trim().is_empty()) {
            config.hero.name = name;
        }
        if let Some(health) = read_value(&lookup, "ARENA_HERO_HEALTH") {
            config.hero.health = health;
        }
        if let Some(attack) = read_value(&lookup, "ARENA_HERO_ATTACK") {
            config.hero.attack = attack;
        }
        if let Some(defense) = read_value(&lookup, "ARENA_HERO_DEFENSE") {
            config.hero.defense = defense;
        }

        let runtime = &mut config.runtime;
        if let Some(ms) = read_value(&lookup, "ARENA_SPAWN_INTERVAL_MS") {
            runtime.spawn_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = read_value(&lookup, "ARENA_POLL_INTERVAL_MS") {
            runtime.poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = read_value(&lookup, "ARENA_ROUND_DELAY_MS") {
            runtime.round_delay = Duration::from_millis(ms);
        }
        if let Some(max_rounds) = read_value::<u32>(&lookup, "ARENA_MAX_ROUNDS") {
            runtime.rules = runtime
                .rules
                .clone()
                .with_max_rounds((max_rounds > 0).then_some(max_rounds));
        }
        if let Some(enabled) = read_value(&lookup, "ARENA_DETECT_STALEMATE") {
            runtime.rules = runtime.rules.clone().with_stalemate_detection(enabled);
        }
        runtime.seed = read_value(&lookup, "ARENA_SEED");

        if let Some(format) = read_value(&lookup, "ARENA_EVENT_FORMAT") {
            config.event_format = format;
        }

        config
    }
}

fn read_value<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> ArenaConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ArenaConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config_from(&[]);
        assert_eq!(config.hero, HeroConfig::default());
        assert_eq!(config.runtime.spawn_interval, Duration::from_secs(3));
        assert_eq!(config.runtime.rules.max_rounds, Some(100));
        assert!(config.runtime.rules.detect_stalemate);
        assert_eq!(config.runtime.seed, None);
        assert_eq!(config.event_format, EventFormat::Text);
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("ARENA_HERO_NAME", "Aria"),
            ("ARENA_HERO_HEALTH", "150"),
            ("ARENA_SPAWN_INTERVAL_MS", "250"),
            ("ARENA_MAX_ROUNDS", "0"),
            ("ARENA_DETECT_STALEMATE", "false"),
            ("ARENA_SEED", "42"),
            ("ARENA_EVENT_FORMAT", "JSON"),
        ]);

        assert_eq!(config.hero.name, "Aria");
        assert_eq!(config.hero.health, 150);
        assert_eq!(config.runtime.spawn_interval, Duration::from_millis(250));
        assert_eq!(config.runtime.rules.max_rounds, None);
        assert!(!config.runtime.rules.detect_stalemate);
        assert_eq!(config.runtime.seed, Some(42));
        assert_eq!(config.event_format, EventFormat::Json);
    }

    #[test]
    fn unparsable_values_fall_back_to_defaults() {
        let config = config_from(&[("ARENA_HERO_ATTACK", "strong"), ("ARENA_HERO_NAME", "  ")]);
        assert_eq!(config.hero, HeroConfig::default());
    }
}
