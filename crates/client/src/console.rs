//! Observers that print the run to stdout.
use std::io::{self, Write};

use arena_core::{AttackOutcome, BattleOutcome, DrawReason};
use runtime::{ArenaObserver, CombatEvent, Event, SpawnEvent, StatusEvent};

/// Prints the battle narration as plain text.
pub struct ConsoleObserver;

impl ArenaObserver for ConsoleObserver {
    fn on_event(&self, event: &Event) {
        let mut stdout = io::stdout().lock();
        for line in narrate(event) {
            // A closed stdout only loses narration.
            let _ = writeln!(stdout, "{line}");
        }
    }
}

/// Prints every event as one JSON line.
pub struct JsonObserver;

impl ArenaObserver for JsonObserver {
    fn on_event(&self, event: &Event) {
        match serde_json::to_string(event) {
            Ok(line) => {
                let _ = writeln!(io::stdout().lock(), "{line}");
            }
            Err(err) => tracing::warn!("Failed to encode {:?} event: {err}", event.topic()),
        }
    }
}

/// Text lines describing one event, possibly none.
pub fn narrate(event: &Event) -> Vec<String> {
    match event {
        Event::Spawn(SpawnEvent::MonsterSpawned { .. }) => {
            vec!["New monster generated!".to_owned()]
        }
        Event::Combat(event) => narrate_combat(event),
        Event::Status(StatusEvent::HeroStatus { hero, remaining }) => vec![
            String::new(),
            "Current status:".to_owned(),
            hero.to_string(),
            format!("Monsters remaining: {remaining}"),
        ],
        Event::Status(StatusEvent::GameOver { .. }) => vec!["Game Over!".to_owned()],
    }
}

fn narrate_combat(event: &CombatEvent) -> Vec<String> {
    match event {
        CombatEvent::BattleStarted { hero, monster, .. } => vec![
            String::new(),
            format!("Battle begins between {} and {}!", hero.name, monster.name()),
        ],
        CombatEvent::Attack {
            attacker,
            defender,
            outcome,
            ..
        } => {
            let line = match outcome {
                AttackOutcome::NoEffect => {
                    format!("{} attacks {}, but it has no effect!", attacker.name, defender.name)
                }
                AttackOutcome::Hit { damage, bonus } => {
                    let prefix = bonus
                        .map(|bonus| format!("{} ", bonus.label()))
                        .unwrap_or_default();
                    format!(
                        "{prefix}{} attacks {} for {damage} damage!",
                        attacker.name, defender.name
                    )
                }
            };
            vec![line]
        }
        CombatEvent::Defeated { combatant, .. } => {
            vec![format!("{} has been defeated!", combatant.name)]
        }
        CombatEvent::Healed { amount, .. } => vec![format!("Character healed with {amount} HP")],
        CombatEvent::BattleEnded {
            outcome: BattleOutcome::Draw(reason),
            rounds,
            ..
        } => {
            let why = match reason {
                DrawReason::Stalemate => "neither side can deal damage",
                DrawReason::RoundLimit => "round limit reached",
                DrawReason::Interrupted => "arena closed",
            };
            vec![format!("The battle ends in a draw after {rounds} rounds: {why}.")]
        }
        CombatEvent::BattleEnded { .. } => Vec::new(),
    }
}
