//! Callback interface for hosts that consume arena events.
//!
//! Observers are invoked from a dedicated forwarding task, one event at a time
//! and in publication order. They must not block for long: a slow observer makes
//! the forwarder lag and drop the oldest events.

use crate::events::Event;

pub trait ArenaObserver: Send + Sync + 'static {
    fn on_event(&self, event: &Event);
}

impl<F> ArenaObserver for F
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event) {
        self(event)
    }
}
