//! FIFO buffer of monsters waiting for their battle.
//!
//! The spawner is the only appender and the arena loop the only remover. Each
//! operation takes the lock for its own duration and never across an await.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arena_core::Entity;

/// Cloneable handle to the shared spawn queue. Unbounded.
#[derive(Clone, Debug, Default)]
pub struct SpawnQueue {
    inner: Arc<Mutex<VecDeque<Entity>>>,
}

impl SpawnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a monster at the back and returns the new length.
    pub fn enqueue(&self, monster: Entity) -> usize {
        let mut queue = self.lock();
        queue.push_back(monster);
        queue.len()
    }

    /// Removes and returns the front monster, if any.
    pub fn try_dequeue(&self) -> Option<Entity> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the deque half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Entity>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
