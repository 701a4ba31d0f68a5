//! Cloneable façade over a running arena.
//!
//! [`ArenaHandle`] hides the shared resources and offers helpers for inspecting
//! the hero and queue, streaming events, and requesting shutdown.
use std::sync::Arc;

use tokio::sync::broadcast;

use arena_core::Entity;

use crate::events::{Event, EventBus, Topic};
use crate::hero::SharedHero;
use crate::queue::SpawnQueue;
use crate::shutdown::Shutdown;
use crate::workers::{ArenaMetrics, MetricsSnapshot};

/// Client-facing handle to interact with the arena
#[derive(Clone)]
pub struct ArenaHandle {
    hero: SharedHero,
    queue: SpawnQueue,
    event_bus: EventBus,
    metrics: Arc<ArenaMetrics>,
    shutdown: Shutdown,
}

impl ArenaHandle {
    pub(crate) fn new(
        hero: SharedHero,
        queue: SpawnQueue,
        event_bus: EventBus,
        metrics: Arc<ArenaMetrics>,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            hero,
            queue,
            event_bus,
            metrics,
            shutdown,
        }
    }

    /// Snapshot of the hero, taken between battle rounds.
    pub async fn hero(&self) -> Entity {
        self.hero.snapshot().await
    }

    /// Monsters currently waiting in the spawn queue.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Spawn` - Monsters entering the queue
    /// - `Topic::Combat` - Battle narration
    /// - `Topic::Status` - Hero status and game over
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut status_rx = handle.subscribe(Topic::Status);
    /// while let Ok(event) = status_rx.recv().await {
    ///     // Handle status reports
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to every event in publication order.
    pub fn subscribe_all(&self) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe_all()
    }

    /// Ask every worker to stop at its next suspension point.
    pub fn request_shutdown(&self) {
        self.shutdown.trigger();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_triggered()
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
