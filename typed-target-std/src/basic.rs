//! In-memory delivery primitive.
//!
//! [`BasicEventTarget`] is a single-node host event target: callbacks are
//! kept per event type and invoked synchronously by
//! [`dispatch_event`](DeliveryTarget::dispatch_event), capture-phase
//! callbacks first, each phase in registration order.
//!
//! Dispatch works on a snapshot of the type's callbacks. A callback removed
//! during a dispatch is not invoked later in that dispatch; a callback added
//! during a dispatch waits for the next one.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
    rc::Rc,
};
use typed_target_core::{
    AddListenerOptions, DeliveryTarget, DispatchError, Event, EventFlags, HostCallback, ListenerId,
};

struct HostEntry<E> {
    callback: HostCallback<E>,
    capture: bool,
    once: bool,
    passive: bool,
    removed: Cell<bool>,
}

impl<E> HostEntry<E> {
    fn matches(&self, id: ListenerId, capture: bool) -> bool {
        ListenerId::of_callback(&self.callback) == id && self.capture == capture
    }
}

/// A host event target kept entirely in memory.
pub struct BasicEventTarget<E> {
    listeners: RefCell<HashMap<String, Vec<Rc<HostEntry<E>>>>>,
}

impl<E> Default for BasicEventTarget<E> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(HashMap::new()),
        }
    }
}

impl<E> fmt::Debug for BasicEventTarget<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.borrow();
        let counts: HashMap<&str, usize> = listeners
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.len()))
            .collect();
        f.debug_struct("BasicEventTarget")
            .field("listeners", &counts)
            .finish()
    }
}

impl<E> BasicEventTarget<E> {
    /// Create an empty target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks registered for `event_type`.
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners
            .borrow()
            .get(event_type)
            .map_or(0, Vec::len)
    }

    /// Whether any callback is registered for `event_type`.
    pub fn has_listeners(&self, event_type: &str) -> bool {
        self.listener_count(event_type) > 0
    }

    fn remove_entry(&self, event_type: &str, id: ListenerId, capture: bool) {
        let mut listeners = self.listeners.borrow_mut();
        let Some(entries) = listeners.get_mut(event_type) else {
            return;
        };
        if let Some(index) = entries.iter().position(|e| e.matches(id, capture)) {
            let entry = entries.remove(index);
            entry.removed.set(true);
        }
        if entries.is_empty() {
            listeners.remove(event_type);
        }
    }
}

impl<E: Event> DeliveryTarget<E> for BasicEventTarget<E> {
    fn add_event_listener(
        &self,
        event_type: &str,
        callback: &HostCallback<E>,
        options: AddListenerOptions,
    ) {
        let id = ListenerId::of_callback(callback);
        let mut listeners = self.listeners.borrow_mut();
        let entries = listeners.entry(event_type.to_owned()).or_default();
        if entries.iter().any(|e| e.matches(id, options.capture)) {
            return;
        }
        entries.push(Rc::new(HostEntry {
            callback: Rc::clone(callback),
            capture: options.capture,
            once: options.once,
            passive: options.passive,
            removed: Cell::new(false),
        }));
    }

    fn remove_event_listener(&self, event_type: &str, callback: &HostCallback<E>, capture: bool) {
        self.remove_entry(event_type, ListenerId::of_callback(callback), capture);
    }

    fn dispatch_event(&self, event: &E) -> Result<bool, DispatchError> {
        let state = event.state();
        if state.contains(EventFlags::DISPATCHING) {
            return Err(DispatchError::AlreadyDispatching(
                event.event_type().to_owned(),
            ));
        }
        state.insert(EventFlags::DISPATCHING);

        let snapshot: Vec<Rc<HostEntry<E>>> = self
            .listeners
            .borrow()
            .get(event.event_type())
            .cloned()
            .unwrap_or_default();

        'phases: for capture_phase in [true, false] {
            for entry in snapshot.iter().filter(|e| e.capture == capture_phase) {
                if state.contains(EventFlags::STOP_IMMEDIATE_PROPAGATION) {
                    break 'phases;
                }
                if entry.removed.get() {
                    continue;
                }
                if entry.once {
                    self.remove_entry(
                        event.event_type(),
                        ListenerId::of_callback(&entry.callback),
                        entry.capture,
                    );
                }
                if entry.passive {
                    state.insert(EventFlags::IN_PASSIVE_LISTENER);
                }
                (entry.callback)(event);
                state.remove(EventFlags::IN_PASSIVE_LISTENER);
            }
        }

        state.remove(EventFlags::DISPATCHING | EventFlags::STOP_IMMEDIATE_PROPAGATION);
        Ok(!event.default_prevented())
    }
}
