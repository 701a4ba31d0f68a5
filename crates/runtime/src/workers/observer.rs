//! Forwards the ordered event stream to registered observers.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};

use crate::api::ArenaObserver;
use crate::events::Event;
use crate::shutdown::ShutdownSignal;

pub struct ObserverWorker {
    observers: Vec<Arc<dyn ArenaObserver>>,
    event_rx: broadcast::Receiver<Event>,
    shutdown: ShutdownSignal,
}

impl ObserverWorker {
    pub fn new(
        observers: Vec<Arc<dyn ArenaObserver>>,
        event_rx: broadcast::Receiver<Event>,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            observers,
            event_rx,
            shutdown,
        }
    }

    /// Main worker loop.
    ///
    /// On shutdown, events already buffered are still delivered before the
    /// worker exits.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                result = self.event_rx.recv() => match result {
                    Ok(event) => self.dispatch(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Observers lagged behind, {skipped} events dropped");
                    }
                    Err(RecvError::Closed) => return,
                },
                _ = self.shutdown.cancelled() => break,
            }
        }

        loop {
            match self.event_rx.try_recv() {
                Ok(event) => self.dispatch(&event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Observers lagged behind, {skipped} events dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        debug!("Observer worker drained and stopped");
    }

    fn dispatch(&self, event: &Event) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}
