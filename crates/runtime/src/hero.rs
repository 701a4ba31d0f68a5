//! The hero shared between the arena loop, battle tasks and clients.

use std::sync::Arc;

use arena_core::Entity;
use tokio::sync::{Mutex, MutexGuard};

/// Cloneable handle to the single long-lived hero.
///
/// Reads return snapshots; mutation happens only inside battle rounds, which
/// hold the lock for the round's two attacks.
#[derive(Clone, Debug)]
pub struct SharedHero {
    inner: Arc<Mutex<Entity>>,
}

impl SharedHero {
    pub fn new(hero: Entity) -> Self {
        Self {
            inner: Arc::new(Mutex::new(hero)),
        }
    }

    /// Copy of the hero as it stands now.
    pub async fn snapshot(&self) -> Entity {
        self.inner.lock().await.clone()
    }

    pub async fn is_alive(&self) -> bool {
        self.inner.lock().await.is_alive()
    }

    pub async fn health(&self) -> i32 {
        self.inner.lock().await.health()
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, Entity> {
        self.inner.lock().await
    }
}
