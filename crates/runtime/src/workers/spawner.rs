//! Background task that stamps monsters into the spawn queue.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use arena_core::{Entity, EntityError, EntityId, MonsterTemplate, Roller};

use crate::events::{Event, EventBus, SpawnEvent};
use crate::queue::SpawnQueue;
use crate::shutdown::ShutdownSignal;

use super::ArenaMetrics;

/// Produces one monster per interval until shutdown. Never applies
/// back-pressure: the queue grows as long as the arena falls behind.
pub struct SpawnerWorker {
    queue: SpawnQueue,
    template: MonsterTemplate,
    interval: Duration,
    roller: Box<dyn Roller>,
    next_id: EntityId,
    event_bus: EventBus,
    metrics: Arc<ArenaMetrics>,
    shutdown: ShutdownSignal,
}

impl SpawnerWorker {
    pub fn new(
        queue: SpawnQueue,
        template: MonsterTemplate,
        interval: Duration,
        roller: Box<dyn Roller>,
        event_bus: EventBus,
        metrics: Arc<ArenaMetrics>,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            queue,
            template,
            interval,
            roller,
            next_id: EntityId::FIRST_MONSTER,
            event_bus,
            metrics,
            shutdown,
        }
    }

    /// Main worker loop. Returns the number of monsters spawned.
    pub async fn run(mut self) -> u64 {
        info!(
            "Spawner started: every {:?}, template {:?}",
            self.interval, self.template
        );

        let mut spawned = 0;
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }

            match self.spawn_one() {
                Ok(()) => spawned += 1,
                Err(err) => {
                    error!("Spawner stopped, template is invalid: {err}");
                    break;
                }
            }
        }

        info!("Spawner stopped after {spawned} monsters");
        spawned
    }

    fn spawn_one(&mut self) -> Result<(), EntityError> {
        let suffix = self.roller.roll_below(MonsterTemplate::NAME_SUFFIX_RANGE);
        let monster = Entity::monster(
            self.next_id,
            self.template.name_for(suffix),
            self.template.health,
            self.template.attack,
            self.template.defense,
        )?;
        self.next_id = self.next_id.next();

        let announced = monster.clone();
        let queue_len = self.queue.enqueue(monster);
        self.metrics.record_spawn(queue_len);

        debug!(
            "Spawned {} {} (queue: {queue_len})",
            announced.id(),
            announced.name()
        );
        self.event_bus
            .publish(Event::Spawn(SpawnEvent::MonsterSpawned {
                monster: announced,
                queue_len,
            }));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use arena_core::{EntityKind, ScriptedRoller};

    use super::*;
    use crate::shutdown::Shutdown;

    fn spawner(queue: &SpawnQueue, shutdown: &Shutdown, rolls: Vec<u32>) -> SpawnerWorker {
        SpawnerWorker::new(
            queue.clone(),
            MonsterTemplate::default(),
            Duration::from_secs(3),
            Box::new(ScriptedRoller::new(rolls)),
            EventBus::new(),
            Arc::new(ArenaMetrics::new()),
            shutdown.signal(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn spawns_once_per_interval() {
        let queue = SpawnQueue::new();
        let shutdown = Shutdown::new();
        let worker = tokio::spawn(spawner(&queue, &shutdown, vec![7, 1234, 999]).run());

        // Five full intervals plus slack, short of the sixth.
        tokio::time::sleep(Duration::from_millis(5 * 3_000 + 1_500)).await;
        shutdown.trigger();
        let spawned = worker.await.unwrap();

        assert_eq!(spawned, 5);
        assert_eq!(queue.len(), 5);

        let mut previous = EntityId::HERO;
        let mut names = Vec::new();
        while let Some(monster) = queue.try_dequeue() {
            assert!(monster.id() > previous);
            assert_eq!(monster.kind(), EntityKind::Monster);
            assert_eq!(
                (monster.health(), monster.attack_power(), monster.defense()),
                (50, 15, 5)
            );
            previous = monster.id();
            names.push(monster.name().to_owned());
        }
        assert_eq!(
            names,
            vec!["Goblin_7", "Goblin_234", "Goblin_999", "Goblin_7", "Goblin_234"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_spawns_before_the_first_interval() {
        let queue = SpawnQueue::new();
        let shutdown = Shutdown::new();
        let worker = tokio::spawn(spawner(&queue, &shutdown, vec![]).run());

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        shutdown.trigger();

        assert_eq!(worker.await.unwrap(), 0);
        assert!(queue.is_empty());
    }
}
