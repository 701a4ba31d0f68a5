//! Foreground loop: pulls monsters off the queue and fights them one by one.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use arena_core::{Battle, BattleRules, Entity};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, StatusEvent};
use crate::hero::SharedHero;
use crate::queue::SpawnQueue;
use crate::shutdown::ShutdownSignal;

use super::ArenaMetrics;
use super::battle::{BattleTask, CombatLock};

/// Why the arena loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaExit {
    /// The hero fell; the run is over.
    HeroDefeated,
    /// Shutdown was requested while the hero was still standing.
    Shutdown,
}

/// Final state handed back by the arena loop.
#[derive(Debug, Clone)]
pub struct ArenaOutcome {
    pub exit: ArenaExit,
    pub battles: u64,
    pub hero: Entity,
}

pub struct ArenaWorker {
    hero: SharedHero,
    queue: SpawnQueue,
    combat_lock: CombatLock,
    rules: BattleRules,
    poll_interval: Duration,
    round_delay: Duration,
    event_bus: EventBus,
    metrics: Arc<ArenaMetrics>,
    shutdown: ShutdownSignal,
    battles: u64,
}

impl ArenaWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        hero: SharedHero,
        queue: SpawnQueue,
        combat_lock: CombatLock,
        rules: BattleRules,
        poll_interval: Duration,
        round_delay: Duration,
        event_bus: EventBus,
        metrics: Arc<ArenaMetrics>,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            hero,
            queue,
            combat_lock,
            rules,
            poll_interval,
            round_delay,
            event_bus,
            metrics,
            shutdown,
            battles: 0,
        }
    }

    /// Main worker loop.
    ///
    /// Polls the queue every interval while the hero is alive. Each dequeued
    /// monster is fought on its own task, which is awaited before polling
    /// again, so battles never overlap.
    pub async fn run(mut self) -> Result<ArenaOutcome> {
        info!("Arena opened, polling every {:?}", self.poll_interval);

        while self.hero.is_alive().await {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!("Arena closing on shutdown after {} battles", self.battles);
                    return Ok(self.finish(ArenaExit::Shutdown).await);
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }

            // The queue lock is released before the battle starts.
            let Some(monster) = self.queue.try_dequeue() else {
                continue;
            };
            let remaining = self.queue.len();
            self.metrics.set_queue_depth(remaining as u64);

            self.fight(monster).await?;

            let hero = self.hero.snapshot().await;
            let remaining = self.queue.len();
            debug!("Status after battle {}: {hero}; {remaining} monsters remaining", self.battles);
            self.event_bus
                .publish(Event::Status(StatusEvent::HeroStatus { hero, remaining }));
        }

        let outcome = self.finish(ArenaExit::HeroDefeated).await;
        info!("Game over after {} battles", outcome.battles);
        self.event_bus.publish(Event::Status(StatusEvent::GameOver {
            hero: outcome.hero.clone(),
            battles: outcome.battles,
        }));
        Ok(outcome)
    }

    async fn fight(&mut self, monster: Entity) -> Result<()> {
        self.battles += 1;
        let task = BattleTask::new(
            self.battles,
            Battle::new(monster, self.rules.clone()),
            self.hero.clone(),
            Arc::clone(&self.combat_lock),
            self.round_delay,
            self.event_bus.clone(),
            Arc::clone(&self.metrics),
            self.shutdown.clone(),
        );

        let report = tokio::spawn(task.run())
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        debug!(
            "Battle {} finished: {:?} in {} rounds",
            self.battles, report.outcome, report.rounds
        );
        Ok(())
    }

    async fn finish(&self, exit: ArenaExit) -> ArenaOutcome {
        ArenaOutcome {
            exit,
            battles: self.battles,
            hero: self.hero.snapshot().await,
        }
    }
}
