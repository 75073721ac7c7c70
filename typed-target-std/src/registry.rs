//! Listener registry.
//!
//! Bookkeeping for which listeners are attached to which event types. Each
//! entry pairs the caller's original [`Listener`] with the wrapped
//! [`HostCallback`] that was actually handed to the delivery primitive, so a
//! later removal can detach the right callback.
//!
//! Invariants:
//! - within one type, no two entries share a listener identity;
//! - a type key exists iff its entry list is non-empty;
//! - the wildcard collection never appears among the concrete keys.

use std::{collections::HashMap, fmt};
use typed_target_core::{AbortHandle, AbortSignal, EventType, HostCallback, Listener, ListenerId};

/// One registration: the original listener and its wrapped callback.
pub struct ListenerEntry<E> {
    listener: Listener<E>,
    wrapped: HostCallback<E>,
    capture: bool,
    passive: bool,
    abort: Option<(AbortSignal, AbortHandle)>,
}

impl<E: 'static> ListenerEntry<E> {
    /// Create a new entry.
    pub fn new(listener: Listener<E>, wrapped: HostCallback<E>, capture: bool) -> Self {
        Self {
            listener,
            wrapped,
            capture,
            passive: false,
            abort: None,
        }
    }

    /// Mark the registration as passive.
    pub fn with_passive(mut self, passive: bool) -> Self {
        self.passive = passive;
        self
    }

    /// Attach the abort callback installed for this registration.
    pub fn with_abort(mut self, signal: AbortSignal, handle: AbortHandle) -> Self {
        self.abort = Some((signal, handle));
        self
    }

    /// The caller's original listener.
    pub fn listener(&self) -> &Listener<E> {
        &self.listener
    }

    /// The callback handed to the delivery primitive.
    pub fn wrapped(&self) -> &HostCallback<E> {
        &self.wrapped
    }

    /// Whether the wrapped callback was registered for the capture phase.
    pub fn capture(&self) -> bool {
        self.capture
    }

    /// Whether the listener may not cancel the event.
    pub fn passive(&self) -> bool {
        self.passive
    }

    fn id(&self) -> ListenerId {
        self.listener.id()
    }
}

/// What [`ListenerRegistry::unregister`] hands back to the caller.
pub struct Detached<E> {
    /// The wrapped callback to detach from the delivery primitive.
    pub callback: HostCallback<E>,
    /// The capture flag it was registered with.
    pub capture: bool,
    /// Whether the entry was the last one for its type.
    pub emptied: bool,
    /// The abort callback to forget, if the registration had a signal.
    pub abort: Option<(AbortSignal, AbortHandle)>,
}

/// One wildcard-collection entry as seen by the fan-out.
pub struct WildcardCallback<E> {
    /// Identity of the original listener.
    pub id: ListenerId,
    /// The wrapped callback to invoke.
    pub callback: HostCallback<E>,
    /// Whether the listener was registered as passive.
    pub passive: bool,
}

/// Owned snapshot of the registry: type → ordered original listeners.
///
/// Taken by value, so it stays valid while the registry keeps changing.
pub struct ListenerMap<E> {
    entries: Vec<(String, Vec<Listener<E>>)>,
}

impl<E: 'static> ListenerMap<E> {
    /// Listeners for `event_type`, if any.
    pub fn get(&self, event_type: &str) -> Option<&[Listener<E>]> {
        self.entries
            .iter()
            .find(|(name, _)| name == event_type)
            .map(|(_, listeners)| listeners.as_slice())
    }

    /// Whether `event_type` has listeners.
    pub fn contains_type(&self, event_type: &str) -> bool {
        self.get(event_type).is_some()
    }

    /// Event types in registration order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over `(type, listeners)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Listener<E>])> {
        self.entries
            .iter()
            .map(|(name, listeners)| (name.as_str(), listeners.as_slice()))
    }

    /// Number of event types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no type has listeners.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: 'static> fmt::Debug for ListenerMap<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<E> Clone for ListenerMap<E> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

/// Mapping from event type to ordered listener entries, plus the wildcard
/// collection.
pub struct ListenerRegistry<E> {
    types: HashMap<String, Vec<ListenerEntry<E>>>,
    order: Vec<String>,
    wildcard: Vec<ListenerEntry<E>>,
}

impl<E: 'static> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> ListenerRegistry<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
            order: Vec::new(),
            wildcard: Vec::new(),
        }
    }

    /// Record `entry` under `event_type`.
    ///
    /// Returns `false` (and drops `entry`) if the same listener is already
    /// registered for that type.
    pub fn register(&mut self, event_type: &EventType, entry: ListenerEntry<E>) -> bool {
        if self.has_listener(event_type, entry.id()) {
            return false;
        }
        match event_type {
            EventType::Wildcard => self.wildcard.push(entry),
            EventType::Named(name) => {
                if !self.types.contains_key(name) {
                    self.order.push(name.clone());
                }
                self.types.entry(name.clone()).or_default().push(entry);
            }
        }
        true
    }

    /// Remove the entry for `(event_type, id)`.
    ///
    /// Returns the wrapped callback so the caller can detach it from the
    /// delivery primitive, or `None` if no such entry exists. When the last
    /// entry of a concrete type goes, the type key is erased and
    /// [`Detached::emptied`] is set.
    pub fn unregister(&mut self, event_type: &EventType, id: ListenerId) -> Option<Detached<E>> {
        match event_type {
            EventType::Wildcard => {
                let index = self.wildcard.iter().position(|e| e.id() == id)?;
                let entry = self.wildcard.remove(index);
                Some(Detached {
                    callback: entry.wrapped,
                    capture: entry.capture,
                    emptied: self.wildcard.is_empty(),
                    abort: entry.abort,
                })
            }
            EventType::Named(name) => {
                let entries = self.types.get_mut(name)?;
                let index = entries.iter().position(|e| e.id() == id)?;
                let entry = entries.remove(index);
                let emptied = entries.is_empty();
                if emptied {
                    self.types.remove(name);
                    self.order.retain(|n| n != name);
                }
                Some(Detached {
                    callback: entry.wrapped,
                    capture: entry.capture,
                    emptied,
                    abort: entry.abort,
                })
            }
        }
    }

    /// Original listeners for `event_type`, in registration order.
    pub fn list_listeners(&self, event_type: &EventType) -> Vec<Listener<E>> {
        self.entries(event_type)
            .iter()
            .map(|e| e.listener.clone())
            .collect()
    }

    /// Whether `id` is registered for `event_type`.
    pub fn has_listener(&self, event_type: &EventType, id: ListenerId) -> bool {
        self.entries(event_type).iter().any(|e| e.id() == id)
    }

    /// Identity of the wrapped callback stored for `(event_type, id)`.
    ///
    /// Tells one registration of a listener apart from a later one.
    pub fn wrapped_id(&self, event_type: &EventType, id: ListenerId) -> Option<ListenerId> {
        self.entries(event_type)
            .iter()
            .find(|e| e.id() == id)
            .map(|e| ListenerId::of_callback(&e.wrapped))
    }

    /// Snapshot of the concrete types, in registration order.
    pub fn types(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Snapshot of the concrete mapping.
    pub fn snapshot(&self) -> ListenerMap<E> {
        let entries = self
            .order
            .iter()
            .map(|name| {
                (
                    name.clone(),
                    self.list_listeners(&EventType::Named(name.clone())),
                )
            })
            .collect();
        ListenerMap { entries }
    }

    /// Snapshot of the wildcard collection, in registration order.
    pub fn wildcard_callbacks(&self) -> Vec<WildcardCallback<E>> {
        self.wildcard
            .iter()
            .map(|e| WildcardCallback {
                id: e.id(),
                callback: e.wrapped.clone(),
                passive: e.passive,
            })
            .collect()
    }

    /// Total number of entries, wildcard collection included.
    pub fn len(&self) -> usize {
        self.types.values().map(Vec::len).sum::<usize>() + self.wildcard.len()
    }

    /// Whether the registry holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.wildcard.is_empty()
    }

    fn entries(&self, event_type: &EventType) -> &[ListenerEntry<E>] {
        match event_type {
            EventType::Wildcard => &self.wildcard,
            EventType::Named(name) => self.types.get(name).map(Vec::as_slice).unwrap_or(&[]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn entry(listener: &Listener<u32>) -> ListenerEntry<u32> {
        ListenerEntry::new(listener.clone(), Rc::new(|_: &u32| {}), false)
    }

    fn named(name: &str) -> EventType {
        EventType::from(name)
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = ListenerRegistry::new();
        let f = Listener::function(|_: &u32| {});

        assert!(registry.register(&named("x"), entry(&f)));
        assert!(!registry.register(&named("x"), entry(&f)));
        assert_eq!(registry.list_listeners(&named("x")), vec![f.clone()]);

        // Same listener, different type: a separate entry.
        assert!(registry.register(&named("y"), entry(&f)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unregister_erases_empty_key() {
        let mut registry = ListenerRegistry::new();
        let f = Listener::function(|_: &u32| {});
        let g = Listener::function(|_: &u32| {});
        registry.register(&named("x"), entry(&f));
        registry.register(&named("x"), entry(&g));

        let detached = registry
            .unregister(&named("x"), f.id())
            .expect("f is registered");
        assert!(!detached.emptied);
        assert_eq!(registry.types(), vec!["x".to_string()]);

        let detached = registry
            .unregister(&named("x"), g.id())
            .expect("g is registered");
        assert!(detached.emptied);
        assert!(registry.types().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_absent_is_none() {
        let mut registry = ListenerRegistry::<u32>::new();
        let f = Listener::function(|_: &u32| {});
        assert!(registry.unregister(&named("x"), f.id()).is_none());
        registry.register(&named("x"), entry(&f));
        assert!(registry.unregister(&named("y"), f.id()).is_none());
        assert!(registry.unregister(&EventType::Wildcard, f.id()).is_none());
    }

    #[test]
    fn test_unregister_returns_wrapped_callback() {
        let mut registry = ListenerRegistry::new();
        let f = Listener::function(|_: &u32| {});
        let wrapped: HostCallback<u32> = Rc::new(|_: &u32| {});
        registry.register(
            &named("x"),
            ListenerEntry::new(f.clone(), wrapped.clone(), true),
        );

        let detached = registry
            .unregister(&named("x"), f.id())
            .expect("f is registered");
        assert!(Rc::ptr_eq(&detached.callback, &wrapped));
        assert!(detached.capture);
        assert!(detached.abort.is_none());
    }

    #[test]
    fn test_unregister_returns_abort_hook() {
        let mut registry = ListenerRegistry::new();
        let f = Listener::function(|_: &u32| {});
        let signal = AbortSignal::default();
        let handle = signal.on_abort(|| {});
        registry.register(&named("x"), entry(&f).with_abort(signal, handle));

        let detached = registry
            .unregister(&named("x"), f.id())
            .expect("f is registered");
        assert_eq!(detached.abort.map(|(_, h)| h), Some(handle));
    }

    #[test]
    fn test_wildcard_collection_is_separate() {
        let mut registry = ListenerRegistry::new();
        let f = Listener::function(|_: &u32| {});
        assert!(registry.register(&EventType::Wildcard, entry(&f).with_passive(true)));
        assert!(!registry.register(&EventType::Wildcard, entry(&f)));

        assert!(registry.types().is_empty());
        assert!(registry.snapshot().is_empty());
        assert_eq!(registry.list_listeners(&EventType::Wildcard), vec![f.clone()]);
        let callbacks = registry.wildcard_callbacks();
        assert_eq!(callbacks.len(), 1);
        assert_eq!(callbacks[0].id, f.id());
        assert!(callbacks[0].passive);

        let detached = registry
            .unregister(&EventType::Wildcard, f.id())
            .expect("f is registered");
        assert!(detached.emptied);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let mut registry = ListenerRegistry::new();
        let f = Listener::function(|_: &u32| {});
        let g = Listener::function(|_: &u32| {});
        registry.register(&named("b"), entry(&g));
        registry.register(&named("a"), entry(&f));
        registry.register(&named("b"), entry(&f));

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.types().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(snapshot.get("b"), Some(&[g.clone(), f.clone()][..]));

        // The snapshot is detached from later mutation.
        registry.unregister(&named("b"), g.id());
        assert_eq!(snapshot.get("b").map(<[_]>::len), Some(2));
        assert_eq!(registry.snapshot().get("b").map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_reregister_after_erase_moves_key_to_end() {
        let mut registry = ListenerRegistry::new();
        let f = Listener::function(|_: &u32| {});
        registry.register(&named("a"), entry(&f));
        registry.register(&named("b"), entry(&f));
        registry.unregister(&named("a"), f.id());
        registry.register(&named("a"), entry(&f));
        assert_eq!(registry.types(), vec!["b".to_string(), "a".to_string()]);
    }
}
