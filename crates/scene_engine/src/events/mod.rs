//! Synchronous event signals
//!
//! Components expose an [`EventSignal`] per event they raise (`changed` on
//! transforms, `collision` on colliders). Posting is immediate: every listener
//! runs to completion, in registration order, before `emit` returns. Nothing is
//! queued across ticks.
//!
//! Listeners receive the [`World`] read-only so they can inspect other
//! components (for example resolve a world matrix) while handling the event.

use crate::ecs::World;
use std::fmt;

/// Identifies a registered listener so it can be disconnected later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type Listener<A> = Box<dyn Fn(&World, &A)>;

/// A list of listeners for one event type
pub struct EventSignal<A> {
    listeners: Vec<(ListenerId, Listener<A>)>,
    next_id: u32,
}

impl<A> EventSignal<A> {
    /// Create a signal with no listeners
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener; it will see every subsequent `emit`
    pub fn connect<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&World, &A) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn disconnect(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Deliver `args` to every listener, in registration order
    pub fn emit(&self, world: &World, args: &A) {
        for (_, listener) in &self.listeners {
            listener(world, args);
        }
    }

    /// Number of connected listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// True when nobody is listening
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<A> Default for EventSignal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for EventSignal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSignal")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
