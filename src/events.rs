//! Document-level pointer listeners with scoped acquisition.
//!
//! A [`Subscription`] detaches its handler when dropped, so every exit path
//! (explicit release, unmount, panic unwinding) removes the listener.

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Opaque handle for a UI region (input box, dropdown, resize handle, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A pointer event in window coordinates. `target` is the innermost element
/// under the pointer, if it is one the hub handed out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    pub target: Option<ElementId>,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64, target: Option<ElementId>) -> Self {
        Self { kind: PointerKind::Down, x, y, target }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self { kind: PointerKind::Move, x, y, target: None }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self { kind: PointerKind::Up, x, y, target: None }
    }
}

type Handler = Arc<dyn Fn(&PointerEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_listener: u64,
    next_element: u64,
    listeners: BTreeMap<u64, (PointerKind, Handler)>,
}

/// The document: hands out element ids, holds listeners, dispatches events.
/// Cloning shares the same registry.
#[derive(Clone, Default)]
pub struct EventHub {
    registry: Arc<Mutex<Registry>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh element id.
    pub fn element(&self) -> ElementId {
        let mut registry = self.registry.lock();
        registry.next_element += 1;
        ElementId(registry.next_element)
    }

    /// Attach `handler` for events of `kind` until the returned subscription is dropped.
    #[must_use = "dropping the subscription detaches the listener immediately"]
    pub fn listen<F>(&self, kind: PointerKind, handler: F) -> Subscription
    where
        F: Fn(&PointerEvent) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        registry.next_listener += 1;
        let id = registry.next_listener;
        registry.listeners.insert(id, (kind, Arc::new(handler)));
        Subscription {
            registry: Arc::downgrade(&self.registry),
            id,
        }
    }

    /// Deliver `event` to every listener of its kind. Returns how many ran.
    ///
    /// Handlers run without the registry lock held, so a handler may attach or
    /// drop subscriptions (a pointer-up ending its own drag, for instance).
    pub fn dispatch(&self, event: &PointerEvent) -> usize {
        let handlers: Vec<Handler> = self
            .registry
            .lock()
            .listeners
            .values()
            .filter(|(kind, _)| *kind == event.kind)
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    pub fn listener_count(&self, kind: PointerKind) -> usize {
        self.registry
            .lock()
            .listeners
            .values()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    pub fn total_listeners(&self) -> usize {
        self.registry.lock().listeners.len()
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.total_listeners())
            .finish()
    }
}

/// Live listener registration. Detaches on drop.
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().listeners.remove(&self.id);
        }
    }
}
