//! Short-lived task that fights one battle against the shared hero.
//!
//! A round runs while holding the combat lock (which also guards the dice)
//! and the hero lock. Both are released before the pacing delay, so the hero
//! can be inspected and the battle cancelled between rounds.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use arena_core::{AttackOutcome, Battle, BattleOutcome, BattleReport, Roller, RoundReport};

use crate::events::{CombatEvent, Combatant, Event, EventBus};
use crate::hero::SharedHero;
use crate::shutdown::ShutdownSignal;

use super::ArenaMetrics;

/// Combat-serialization resource: whoever holds it plays the next round.
pub type CombatLock = Arc<Mutex<Box<dyn Roller>>>;

pub struct BattleTask {
    id: u64,
    battle: Battle,
    hero: SharedHero,
    combat_lock: CombatLock,
    round_delay: Duration,
    event_bus: EventBus,
    metrics: Arc<ArenaMetrics>,
    shutdown: ShutdownSignal,
}

impl BattleTask {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        battle: Battle,
        hero: SharedHero,
        combat_lock: CombatLock,
        round_delay: Duration,
        event_bus: EventBus,
        metrics: Arc<ArenaMetrics>,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            id,
            battle,
            hero,
            combat_lock,
            round_delay,
            event_bus,
            metrics,
            shutdown,
        }
    }

    pub async fn run(self) -> BattleReport {
        let Self {
            id,
            mut battle,
            hero: shared_hero,
            combat_lock,
            round_delay,
            event_bus,
            metrics,
            mut shutdown,
        } = self;
        let narrator = Narrator { id, event_bus };

        let hero = Combatant::of(&shared_hero.snapshot().await);
        let monster = Combatant::of(battle.monster());

        debug!("Battle {id} begins: {} vs {}", hero.name, monster.name);
        narrator.publish(CombatEvent::BattleStarted {
            battle: id,
            hero: hero.clone(),
            monster: battle.monster().clone(),
        });

        loop {
            let (round, hero_health) = {
                let mut dice = combat_lock.lock().await;
                let mut hero_state = shared_hero.lock().await;
                let round = battle.play_round(&mut hero_state, &mut *dice);
                (round, hero_state.health())
            };

            if round.hero_attack.is_some() {
                metrics.record_round();
            }
            narrator.round(&round, &hero, &monster, battle.monster().health(), hero_health);

            if round.state.is_finished() {
                break;
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    debug!("Battle {id} interrupted by shutdown");
                    break;
                }
                _ = tokio::time::sleep(round_delay) => {}
            }
        }

        let report = {
            let mut hero_state = shared_hero.lock().await;
            battle.conclude(&mut hero_state)
        };

        if let Some(amount) = report.healed {
            narrator.publish(CombatEvent::Healed {
                battle: id,
                hero: hero.clone(),
                amount,
                health: report.hero_health,
            });
        }
        if let BattleOutcome::Draw(reason) = report.outcome {
            warn!(
                "Battle {id} between {} and {} ended in a draw ({reason:?}) after {} rounds",
                hero.name, monster.name, report.rounds
            );
        }

        metrics.record_battle(report.outcome);
        narrator.publish(CombatEvent::BattleEnded {
            battle: id,
            outcome: report.outcome,
            rounds: report.rounds,
        });

        report
    }
}

/// Turns round reports into combat events for one battle.
struct Narrator {
    id: u64,
    event_bus: EventBus,
}

impl Narrator {
    fn round(
        &self,
        round: &RoundReport,
        hero: &Combatant,
        monster: &Combatant,
        monster_health: i32,
        hero_health: i32,
    ) {
        trace!("Battle {} round {}: {:?}", self.id, round.round, round);

        // A monster attack is only reported when the monster survived the
        // hero's attack, so the monster's current health is the value right
        // after the hero struck.
        if let Some(outcome) = round.hero_attack {
            self.attack(round.round, hero, monster, outcome, monster_health);
            if monster_health <= 0 {
                self.defeated(monster);
            }
        }

        if let Some(outcome) = round.monster_attack {
            self.attack(round.round, monster, hero, outcome, hero_health);
            if hero_health <= 0 {
                self.defeated(hero);
            }
        }
    }

    fn attack(
        &self,
        round: u32,
        attacker: &Combatant,
        defender: &Combatant,
        outcome: AttackOutcome,
        defender_health: i32,
    ) {
        self.publish(CombatEvent::Attack {
            battle: self.id,
            round,
            attacker: attacker.clone(),
            defender: defender.clone(),
            outcome,
            defender_health,
        });
    }

    fn defeated(&self, combatant: &Combatant) {
        debug!("Battle {}: {} has been defeated", self.id, combatant.name);
        self.publish(CombatEvent::Defeated {
            battle: self.id,
            combatant: combatant.clone(),
        });
    }

    fn publish(&self, event: CombatEvent) {
        self.event_bus.publish(Event::Combat(event));
    }
}

#[cfg(test)]
mod tests {
    use arena_core::{BattleRules, Entity, EntityId, ScriptedRoller};

    use super::*;
    use crate::shutdown::Shutdown;

    fn combat_lock() -> CombatLock {
        Arc::new(Mutex::new(Box::new(ScriptedRoller::without_bonuses()) as Box<dyn Roller>))
    }

    fn task(hero: &SharedHero, lock: &CombatLock, shutdown: &Shutdown) -> BattleTask {
        let goblin = Entity::monster(EntityId(1), "Goblin_1", 50, 15, 5).unwrap();
        BattleTask::new(
            1,
            Battle::new(goblin, BattleRules::default()),
            hero.clone(),
            Arc::clone(lock),
            Duration::from_millis(500),
            EventBus::new(),
            Arc::new(ArenaMetrics::new()),
            shutdown.signal(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn locks_are_free_during_the_round_delay() {
        let hero = SharedHero::new(Entity::hero("Hero", 100, 20, 10).unwrap());
        let lock = combat_lock();
        let shutdown = Shutdown::new();
        let battle = tokio::spawn(task(&hero, &lock, &shutdown).run());

        // Round 1 lands at 0ms, round 2 at 500ms.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(lock.try_lock().is_ok());
        assert_eq!(hero.health().await, 95);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(lock.try_lock().is_ok());
        assert_eq!(hero.health().await, 90);

        let report = battle.await.unwrap();
        assert_eq!(report.outcome, BattleOutcome::HeroWins);
        assert_eq!(report.rounds, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn a_held_combat_lock_holds_back_the_next_round() {
        let hero = SharedHero::new(Entity::hero("Hero", 100, 20, 10).unwrap());
        let lock = combat_lock();
        let shutdown = Shutdown::new();
        let battle = tokio::spawn(task(&hero, &lock, &shutdown).run());

        tokio::time::sleep(Duration::from_millis(200)).await;
        let guard = lock.try_lock().unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(hero.health().await, 95);

        drop(guard);
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(hero.health().await, 90);

        let report = battle.await.unwrap();
        assert_eq!(report.outcome, BattleOutcome::HeroWins);
    }
}
