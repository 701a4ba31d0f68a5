//! High-level runtime orchestrator.
//!
//! The runtime owns the background workers, wires the queue, hero, event bus
//! and shutdown signal between them, and exposes a builder-based API for
//! clients to start a run.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use arena_core::{
    BattleRules, Entity, EntityId, EntityKind, MonsterTemplate, Roller, SeededRoller,
    compute_seed,
};

use crate::api::{ArenaHandle, ArenaObserver, Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::hero::SharedHero;
use crate::queue::SpawnQueue;
use crate::shutdown::Shutdown;
use crate::workers::{
    ArenaMetrics, ArenaOutcome, ArenaWorker, CombatLock, MetricsSnapshot, ObserverWorker,
    SpawnerWorker,
};

pub use crate::workers::ArenaExit;

const SPAWNER_CONTEXT: u32 = 0;
const BATTLE_CONTEXT: u32 = 1;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Delay between two spawns (and before the first one)
    pub spawn_interval: Duration,
    /// Delay between two queue polls in the arena loop
    pub poll_interval: Duration,
    /// Pacing delay between battle rounds
    pub round_delay: Duration,
    pub event_buffer_size: usize,
    pub monster: MonsterTemplate,
    pub rules: BattleRules,
    /// Fixed seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            spawn_interval: Duration::from_secs(3),
            poll_interval: Duration::from_secs(1),
            round_delay: Duration::from_millis(500),
            event_buffer_size: 256,
            monster: MonsterTemplate::default(),
            rules: BattleRules::default(),
            seed: None,
        }
    }
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.spawn_interval.is_zero() {
            return Err(RuntimeError::InvalidConfig {
                reason: "spawn interval must be positive",
            });
        }
        if self.poll_interval.is_zero() {
            return Err(RuntimeError::InvalidConfig {
                reason: "poll interval must be positive",
            });
        }
        if self.event_buffer_size == 0 {
            return Err(RuntimeError::InvalidConfig {
                reason: "event buffer size must be positive",
            });
        }
        if self.rules.max_rounds == Some(0) {
            return Err(RuntimeError::InvalidConfig {
                reason: "round cap must be positive; use None to disable it",
            });
        }
        // Probe the template once so the spawner cannot fail later.
        Entity::monster(
            EntityId::FIRST_MONSTER,
            self.monster.name_for(0),
            self.monster.health,
            self.monster.attack,
            self.monster.defense,
        )
        .map_err(RuntimeError::InvalidMonsterTemplate)?;
        Ok(())
    }
}

/// What a finished run looked like.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub exit: ArenaExit,
    pub battles: u64,
    pub hero: Entity,
    pub spawned: u64,
    pub metrics: MetricsSnapshot,
}

/// Main runtime that orchestrates a run.
///
/// The runtime owns the worker tasks; [`ArenaHandle`] provides a cloneable
/// façade for clients.
pub struct Runtime {
    handle: ArenaHandle,
    shutdown: Shutdown,
    /// Stops the observer worker once every publisher has finished.
    observer_stop: Shutdown,
    metrics: Arc<ArenaMetrics>,

    arena_worker_handle: JoinHandle<Result<ArenaOutcome>>,
    spawner_worker_handle: JoinHandle<u64>,
    observer_worker_handle: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> ArenaHandle {
        self.handle.clone()
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Waits until the arena loop ends, then stops the remaining workers.
    ///
    /// The arena loop ends when the hero falls or when shutdown is requested
    /// through a handle.
    pub async fn wait(self) -> Result<RunSummary> {
        let outcome = self
            .arena_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)??;

        self.shutdown.trigger();
        let spawned = self
            .spawner_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        self.observer_stop.trigger();
        if let Some(observer_handle) = self.observer_worker_handle {
            observer_handle.await.map_err(RuntimeError::WorkerJoin)?;
        }

        let summary = RunSummary {
            exit: outcome.exit,
            battles: outcome.battles,
            hero: outcome.hero,
            spawned,
            metrics: self.metrics.snapshot(),
        };
        info!(
            "Run finished ({:?}): {} battles, {} monsters spawned",
            summary.exit, summary.battles, summary.spawned
        );
        Ok(summary)
    }

    /// Shutdown the runtime gracefully
    ///
    /// A battle in progress ends as an interrupted draw at its next round
    /// boundary.
    pub async fn shutdown(self) -> Result<RunSummary> {
        self.shutdown.trigger();
        self.wait().await
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    hero: Option<Entity>,
    queue: Option<SpawnQueue>,
    battle_roller: Option<Box<dyn Roller>>,
    spawn_roller: Option<Box<dyn Roller>>,
    observers: Vec<Arc<dyn ArenaObserver>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            hero: None,
            queue: None,
            battle_roller: None,
            spawn_roller: None,
            observers: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the hero (required)
    pub fn hero(mut self, hero: Entity) -> Self {
        self.hero = Some(hero);
        self
    }

    /// Start from an existing queue, e.g. one pre-filled with monsters.
    pub fn queue(mut self, queue: SpawnQueue) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Dice for combat bonuses. Seeded from the config when not set.
    pub fn battle_roller(mut self, roller: impl Roller + 'static) -> Self {
        self.battle_roller = Some(Box::new(roller));
        self
    }

    /// Dice for monster name suffixes. Seeded from the config when not set.
    pub fn spawn_roller(mut self, roller: impl Roller + 'static) -> Self {
        self.spawn_roller = Some(Box::new(roller));
        self
    }

    /// Register an observer; every event is delivered in publication order.
    pub fn observer(mut self, observer: impl ArenaObserver) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Build the runtime and start its workers.
    pub async fn build(self) -> Result<Runtime> {
        self.config.validate()?;

        let hero = self.hero.ok_or(RuntimeError::MissingHero)?;
        if hero.kind() != EntityKind::Hero {
            return Err(RuntimeError::InvalidConfig {
                reason: "the arena hero must be of the hero kind",
            });
        }
        if !hero.is_alive() {
            return Err(RuntimeError::HeroAlreadyDefeated {
                name: hero.name().to_owned(),
                health: hero.health(),
            });
        }

        let config = self.config;
        let (spawn_roller, battle_roller) = match config.seed {
            Some(seed) => {
                debug!("Seeding run with {seed}");
                (
                    self.spawn_roller.unwrap_or_else(|| seeded(seed, SPAWNER_CONTEXT)),
                    self.battle_roller.unwrap_or_else(|| seeded(seed, BATTLE_CONTEXT)),
                )
            }
            None => (
                self.spawn_roller
                    .unwrap_or_else(|| Box::new(SeededRoller::from_entropy())),
                self.battle_roller
                    .unwrap_or_else(|| Box::new(SeededRoller::from_entropy())),
            ),
        };

        let hero = SharedHero::new(hero);
        let queue = self.queue.unwrap_or_default();
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let metrics = Arc::new(ArenaMetrics::new());
        let shutdown = Shutdown::new();
        let combat_lock: CombatLock = Arc::new(Mutex::new(battle_roller));

        let handle = ArenaHandle::new(
            hero.clone(),
            queue.clone(),
            event_bus.clone(),
            Arc::clone(&metrics),
            shutdown.clone(),
        );

        // Subscribe before any worker can publish.
        let observer_stop = Shutdown::new();
        let observer_worker_handle = if self.observers.is_empty() {
            None
        } else {
            let observer_worker = ObserverWorker::new(
                self.observers,
                event_bus.subscribe_all(),
                observer_stop.signal(),
            );
            Some(tokio::spawn(observer_worker.run()))
        };

        let spawner_worker = SpawnerWorker::new(
            queue.clone(),
            config.monster.clone(),
            config.spawn_interval,
            spawn_roller,
            event_bus.clone(),
            Arc::clone(&metrics),
            shutdown.signal(),
        );
        let spawner_worker_handle = tokio::spawn(spawner_worker.run());

        let arena_worker = ArenaWorker::new(
            hero,
            queue,
            combat_lock,
            config.rules.clone(),
            config.poll_interval,
            config.round_delay,
            event_bus,
            Arc::clone(&metrics),
            shutdown.signal(),
        );
        let arena_worker_handle = tokio::spawn(arena_worker.run());

        info!(
            "Arena runtime started: spawn every {:?}, poll every {:?}, rounds every {:?}",
            config.spawn_interval, config.poll_interval, config.round_delay
        );

        Ok(Runtime {
            handle,
            shutdown,
            observer_stop,
            metrics,
            arena_worker_handle,
            spawner_worker_handle,
            observer_worker_handle,
        })
    }
}

fn seeded(run_seed: u64, context: u32) -> Box<dyn Roller> {
    Box::new(SeededRoller::new(compute_seed(run_seed, 0, context)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RuntimeConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_intervals_are_rejected() {
        let config = RuntimeConfig {
            spawn_interval: Duration::ZERO,
            ..RuntimeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RuntimeError::InvalidConfig { .. })
        ));

        let config = RuntimeConfig {
            event_buffer_size: 0,
            ..RuntimeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RuntimeError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn zero_round_cap_is_rejected() {
        let config = RuntimeConfig {
            rules: BattleRules::default().with_max_rounds(Some(0)),
            ..RuntimeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RuntimeError::InvalidConfig { .. })
        ));

        let uncapped = RuntimeConfig {
            rules: BattleRules::default().with_max_rounds(None),
            ..RuntimeConfig::default()
        };
        assert!(uncapped.validate().is_ok());
    }

    #[test]
    fn broken_monster_template_is_rejected() {
        let config = RuntimeConfig {
            monster: MonsterTemplate {
                attack: -1,
                ..MonsterTemplate::default()
            },
            ..RuntimeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RuntimeError::InvalidMonsterTemplate(_))
        ));
    }

    #[tokio::test]
    async fn build_requires_a_living_hero() {
        let missing = Runtime::builder().build().await;
        assert!(matches!(missing, Err(RuntimeError::MissingHero)));

        let fallen = Runtime::builder()
            .hero(Entity::hero("Hero", 0, 20, 10).unwrap())
            .build()
            .await;
        assert!(matches!(
            fallen,
            Err(RuntimeError::HeroAlreadyDefeated { health: 0, .. })
        ));

        let goblin = Entity::monster(EntityId(1), "Goblin_1", 50, 15, 5).unwrap();
        let wrong_kind = Runtime::builder().hero(goblin).build().await;
        assert!(matches!(wrong_kind, Err(RuntimeError::InvalidConfig { .. })));
    }
}
