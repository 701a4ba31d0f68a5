//! Topic-based event bus implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{CombatEvent, SpawnEvent, StatusEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Monsters entering the spawn queue
    Spawn,
    /// Battle narration (attacks, defeats, heals)
    Combat,
    /// Hero status reports and game over
    Status,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Spawn(SpawnEvent),
    Combat(CombatEvent),
    Status(StatusEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Spawn(_) => Topic::Spawn,
            Event::Combat(_) => Topic::Combat,
            Event::Status(_) => Topic::Status,
        }
    }
}

struct Channels {
    spawn: broadcast::Sender<Event>,
    combat: broadcast::Sender<Event>,
    status: broadcast::Sender<Event>,
    /// Every event regardless of topic, in publication order.
    all: broadcast::Sender<Event>,
}

impl Channels {
    fn topic(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Spawn => &self.spawn,
            Topic::Combat => &self.combat,
            Topic::Status => &self.status,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about, or to the whole stream in publication order.
/// Publishing never blocks; a slow subscriber lags instead.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                spawn: broadcast::channel(capacity).0,
                combat: broadcast::channel(capacity).0,
                status: broadcast::channel(capacity).0,
                all: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        // No subscribers is normal, not an error
        if self.channels.all.send(event.clone()).is_err() {
            tracing::trace!("No stream subscribers for {:?} event", topic);
        }
        if self.channels.topic(topic).send(event).is_err() {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.topic(topic).subscribe()
    }

    /// Subscribe to every topic through a single ordered stream.
    pub fn subscribe_all(&self) -> broadcast::Receiver<Event> {
        self.channels.all.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use arena_core::{Entity, EntityId};

    use super::*;

    fn spawned(id: u64) -> Event {
        let monster = Entity::monster(EntityId(id), format!("Goblin_{id}"), 50, 15, 5).unwrap();
        Event::Spawn(SpawnEvent::MonsterSpawned {
            monster,
            queue_len: 1,
        })
    }

    fn game_over() -> Event {
        Event::Status(StatusEvent::GameOver {
            hero: Entity::hero("Hero", 0, 20, 10).unwrap(),
            battles: 3,
        })
    }

    #[tokio::test]
    async fn topic_subscribers_only_see_their_topic() {
        let bus = EventBus::new();
        let mut status = bus.subscribe(Topic::Status);

        bus.publish(spawned(1));
        bus.publish(game_over());

        let event = status.recv().await.unwrap();
        assert_eq!(event.topic(), Topic::Status);
        assert!(status.try_recv().is_err());
    }

    #[tokio::test]
    async fn stream_preserves_publication_order() {
        let bus = EventBus::with_capacity(8);
        let mut all = bus.subscribe_all();

        bus.publish(spawned(1));
        bus.publish(game_over());
        bus.publish(spawned(2));

        let topics: Vec<Topic> = (0..3).map(|_| all.try_recv().unwrap().topic()).collect();
        assert_eq!(topics, vec![Topic::Spawn, Topic::Status, Topic::Spawn]);
    }

    #[test]
    fn events_serialize_with_variant_names() {
        let json = serde_json::to_value(spawned(7)).unwrap();
        assert_eq!(json["Spawn"]["MonsterSpawned"]["queue_len"], 1);
        assert_eq!(json["Spawn"]["MonsterSpawned"]["monster"]["name"], "Goblin_7");
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(spawned(1));
    }
}
