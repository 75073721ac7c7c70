//! # Dispatch controller
//!
//! [`TypedEventTarget`] is what callers talk to. It sits on a host
//! [`DeliveryTarget`] and adds what the host lacks: listener introspection,
//! bulk removal, per-type muting and wildcard subscriptions.
//!
//! Registration wraps the caller's listener in the decorator pipeline (see
//! [`pipeline`](crate::pipeline)), hands the wrapped callback to the host and
//! records the pair in the [`ListenerRegistry`]. Removal looks the wrapped
//! callback up again, detaches it from the host and erases the entry.
//!
//! # Reentrancy
//!
//! Listeners may register, remove, mute or emit while they run. No borrow of
//! the registry is ever held across a callback, and every bulk operation
//! works on an owned snapshot of the keys or entries it touches.

use crate::{
    basic::BasicEventTarget,
    config::{TargetConfig, WildcardMode},
    muted::MutedTypes,
    pipeline::{MuteScope, decorate},
    registry::{Detached, ListenerEntry, ListenerMap, ListenerRegistry},
};
use std::{
    cell::{OnceCell, RefCell},
    fmt,
    rc::{Rc, Weak},
};
use typed_target_core::{
    AbortHandle, AbortSignal, AddListenerOptions, DeliveryTarget, DispatchError, Event,
    EventFlags, EventType, IntoListener, Listener, ListenerId, ListenerOptions, MapVariant,
};

/// Weak handle to one registration's wrapped callback.
type Registration<E> = Weak<dyn Fn(&E)>;

struct TargetInner<E, T> {
    host: T,
    registry: RefCell<ListenerRegistry<E>>,
    muted: Rc<MutedTypes>,
    config: TargetConfig,
}

impl<E: Event, T: DeliveryTarget<E>> TargetInner<E, T> {
    /// Erase `(event_type, id)` from the registry and detach its wrapped
    /// callback from the host. Returns whether anything was removed.
    fn detach(&self, event_type: &EventType, id: ListenerId) -> bool {
        let detached = self.registry.borrow_mut().unregister(event_type, id);
        self.release(event_type, id, detached)
    }

    /// Like [`detach`](Self::detach), but only if the entry is still the
    /// registration whose wrapped callback is `registration`.
    fn detach_registration(
        &self,
        event_type: &EventType,
        id: ListenerId,
        registration: &Registration<E>,
    ) -> bool {
        // A dead handle means the registration is already gone.
        let Some(wrapped) = registration.upgrade() else {
            return false;
        };
        let detached = {
            let mut registry = self.registry.borrow_mut();
            if registry.wrapped_id(event_type, id) != Some(ListenerId::of_callback(&wrapped)) {
                return false;
            }
            registry.unregister(event_type, id)
        };
        self.release(event_type, id, detached)
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn release(&self, event_type: &EventType, id: ListenerId, detached: Option<Detached<E>>) -> bool {
        let Some(detached) = detached else {
            return false;
        };
        if let EventType::Named(name) = event_type {
            self.host
                .remove_event_listener(name, &detached.callback, detached.capture);
            if detached.emptied {
                self.muted.remove(name);
            }
        }
        if let Some((signal, handle)) = detached.abort {
            signal.forget(handle);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(event_type = %event_type, ?id, "listener removed");
        true
    }
}

/// A typed event target layered over a host delivery primitive.
///
/// Cloning is cheap and yields a handle to the same target, which is how a
/// listener can reach its own target.
///
/// # Example
///
/// ```rust
/// use typed_target_std::{events::BasicEvent, target::TypedEventTarget};
///
/// let target = TypedEventTarget::<BasicEvent>::new();
/// let hello = target.on("hello", |event: &BasicEvent| {
///     println!("got {}", typed_target_core::Event::event_type(event));
/// });
///
/// target.mute("hello");
/// target.emit(&BasicEvent::new("hello")).unwrap(); // suppressed
/// target.unmute("hello");
/// target.emit(&BasicEvent::new("hello")).unwrap(); // delivered
///
/// target.off("hello", &hello);
/// assert!(target.listeners().is_empty());
/// ```
pub struct TypedEventTarget<E, T = BasicEventTarget<E>> {
    inner: Rc<TargetInner<E, T>>,
}

impl<E, T> Clone for TypedEventTarget<E, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: Event, T: fmt::Debug> fmt::Debug for TypedEventTarget<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedEventTarget")
            .field("host", &self.inner.host)
            .field("listeners", &self.inner.registry.borrow().snapshot())
            .field("muted", &self.inner.muted.snapshot())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl<E: Event, T: DeliveryTarget<E> + Default + 'static> Default for TypedEventTarget<E, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event, T: DeliveryTarget<E> + Default + 'static> TypedEventTarget<E, T> {
    /// Create a target over a fresh host with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TargetConfig::default())
    }

    /// Create a target over a fresh host.
    pub fn with_config(config: TargetConfig) -> Self {
        Self::with_host(T::default(), config)
    }
}

impl<E: Event, T: DeliveryTarget<E> + 'static> TypedEventTarget<E, T> {
    /// Create a target over an existing host.
    pub fn with_host(host: T, config: TargetConfig) -> Self {
        Self {
            inner: Rc::new(TargetInner {
                host,
                registry: RefCell::new(ListenerRegistry::new()),
                muted: Rc::new(MutedTypes::new()),
                config,
            }),
        }
    }

    /// The underlying delivery primitive.
    pub fn host(&self) -> &T {
        &self.inner.host
    }

    /// The target's configuration.
    pub fn config(&self) -> &TargetConfig {
        &self.inner.config
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register `listener` for `event_type`.
    ///
    /// `None` is accepted and ignored, as is a registration whose signal has
    /// already aborted or a listener already registered for the type.
    ///
    /// The wildcard registers according to the configured [`WildcardMode`].
    pub fn add_listener(
        &self,
        event_type: impl Into<EventType>,
        listener: Option<Listener<E>>,
        options: ListenerOptions,
    ) {
        let Some(listener) = listener else {
            return;
        };
        if options.signal.as_ref().is_some_and(AbortSignal::is_aborted) {
            return;
        }
        match event_type.into() {
            EventType::Wildcard => match self.inner.config.wildcard {
                WildcardMode::Snapshot => {
                    let types = self.inner.registry.borrow().types();
                    for name in types {
                        self.register(EventType::Named(name), &listener, &options);
                    }
                }
                WildcardMode::Standing => {
                    self.register(EventType::Wildcard, &listener, &options);
                }
            },
            named => self.register(named, &listener, &options),
        }
    }

    /// Register a listener; returns the handle to remove it with.
    pub fn on(&self, event_type: impl Into<EventType>, listener: impl IntoListener<E>) -> Listener<E> {
        let listener = listener.into_listener();
        self.add_listener(event_type, Some(listener.clone()), ListenerOptions::default());
        listener
    }

    /// Register a listener that is removed after its first delivery.
    pub fn once(
        &self,
        event_type: impl Into<EventType>,
        listener: impl IntoListener<E>,
    ) -> Listener<E> {
        let listener = listener.into_listener();
        self.add_listener(event_type, Some(listener.clone()), ListenerOptions::once());
        listener
    }

    /// Register a listener for the concrete event `V` of this target's
    /// event map; it receives `&V` instead of the map type.
    pub fn on_event<V>(&self, f: impl Fn(&V) + 'static) -> Listener<E>
    where
        V: MapVariant<E>,
    {
        self.on(V::TYPE, Self::project(f))
    }

    /// Like [`on_event`](Self::on_event), removed after its first delivery.
    pub fn once_event<V>(&self, f: impl Fn(&V) + 'static) -> Listener<E>
    where
        V: MapVariant<E>,
    {
        self.once(V::TYPE, Self::project(f))
    }

    fn project<V: MapVariant<E>>(f: impl Fn(&V) + 'static) -> Listener<E> {
        Listener::function(move |event: &E| {
            if let Some(variant) = V::project(event) {
                f(variant);
            }
        })
    }

    fn register(&self, event_type: EventType, listener: &Listener<E>, options: &ListenerOptions) {
        if self
            .inner
            .registry
            .borrow()
            .has_listener(&event_type, listener.id())
        {
            return;
        }

        let scope = match &event_type {
            EventType::Named(name) => MuteScope::Registered(name.clone()),
            EventType::Wildcard => MuteScope::Delivered,
        };
        let slot = Rc::new(OnceCell::new());
        let consume = options
            .once
            .then(|| self.consumer(&event_type, listener.id(), Rc::clone(&slot)));
        let wrapped = decorate(listener, scope, Rc::clone(&self.inner.muted), consume);
        let registration: Registration<E> = Rc::downgrade(&wrapped);
        slot.get_or_init(|| registration.clone());

        if let EventType::Named(name) = &event_type {
            // Once is enforced by the pipeline; the host must not consume
            // the callback on a muted delivery.
            let host_options = AddListenerOptions {
                once: false,
                ..AddListenerOptions::from(options)
            };
            self.inner
                .host
                .add_event_listener(name, &wrapped, host_options);
        }
        let mut entry = ListenerEntry::new(listener.clone(), wrapped, options.capture)
            .with_passive(options.passive);
        if let Some(signal) = &options.signal {
            let handle = self.watch(signal, event_type.clone(), listener.id(), registration);
            entry = entry.with_abort(signal.clone(), handle);
        }
        self.inner.registry.borrow_mut().register(&event_type, entry);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            event_type = %event_type,
            id = ?listener.id(),
            once = options.once,
            capture = options.capture,
            "listener registered"
        );
    }

    // The once and abort hooks only ever remove the registration that
    // created them, never a later re-registration of the same listener.

    fn consumer(
        &self,
        event_type: &EventType,
        id: ListenerId,
        slot: Rc<OnceCell<Registration<E>>>,
    ) -> Box<dyn Fn()> {
        let target = Rc::downgrade(&self.inner);
        let event_type = event_type.clone();
        Box::new(move || {
            let (Some(inner), Some(registration)) = (target.upgrade(), slot.get()) else {
                return;
            };
            #[cfg(feature = "tracing")]
            tracing::trace!(event_type = %event_type, ?id, "once listener consumed");
            inner.detach_registration(&event_type, id, registration);
        })
    }

    fn watch(
        &self,
        signal: &AbortSignal,
        event_type: EventType,
        id: ListenerId,
        registration: Registration<E>,
    ) -> AbortHandle {
        let target = Rc::downgrade(&self.inner);
        signal.on_abort(move || {
            if let Some(inner) = target.upgrade() {
                #[cfg(feature = "tracing")]
                tracing::debug!(event_type = %event_type, ?id, "listener aborted");
                inner.detach_registration(&event_type, id, &registration);
            }
        })
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    /// Remove `listener` from `event_type`.
    ///
    /// The wildcard removes it from every concrete type and from the
    /// wildcard collection. Removing an absent listener does nothing. The
    /// capture flag recorded at registration is used to detach it from the
    /// host.
    pub fn remove_listener(&self, event_type: impl Into<EventType>, listener: &Listener<E>) {
        let id = listener.id();
        match event_type.into() {
            EventType::Wildcard => {
                let types = self.inner.registry.borrow().types();
                for name in types {
                    self.inner.detach(&EventType::Named(name), id);
                }
                self.inner.detach(&EventType::Wildcard, id);
            }
            named => {
                self.inner.detach(&named, id);
            }
        }
    }

    /// Alias for [`remove_listener`](Self::remove_listener).
    pub fn off(&self, event_type: impl Into<EventType>, listener: &Listener<E>) {
        self.remove_listener(event_type, listener);
    }

    /// Remove every listener for `event_type`.
    ///
    /// The wildcard clears every concrete type and the wildcard collection.
    pub fn clear(&self, event_type: impl Into<EventType>) {
        match event_type.into() {
            EventType::Wildcard => {
                let types = self.inner.registry.borrow().types();
                for name in types {
                    self.clear_type(&EventType::Named(name));
                }
                self.clear_type(&EventType::Wildcard);
            }
            named => self.clear_type(&named),
        }
    }

    fn clear_type(&self, event_type: &EventType) {
        let listeners = self.inner.registry.borrow().list_listeners(event_type);
        #[cfg(feature = "tracing")]
        tracing::debug!(event_type = %event_type, count = listeners.len(), "clearing listeners");
        for listener in listeners {
            self.inner.detach(event_type, listener.id());
        }
    }

    // ------------------------------------------------------------------
    // Muting
    // ------------------------------------------------------------------

    /// Suppress delivery for `event_type`.
    ///
    /// The wildcard mutes every type that has listeners right now; types
    /// registered afterwards are not muted. Muting a type with no listeners
    /// just records it.
    pub fn mute(&self, event_type: impl Into<EventType>) {
        for name in self.affected_types(event_type.into()) {
            if self.inner.muted.insert(&name) {
                #[cfg(feature = "tracing")]
                tracing::debug!(event_type = %name, "muted");
            }
        }
    }

    /// Resume delivery for `event_type`.
    ///
    /// The wildcard unmutes every type that has listeners right now.
    pub fn unmute(&self, event_type: impl Into<EventType>) {
        for name in self.affected_types(event_type.into()) {
            if self.inner.muted.remove(&name) {
                #[cfg(feature = "tracing")]
                tracing::debug!(event_type = %name, "unmuted");
            }
        }
    }

    fn affected_types(&self, event_type: EventType) -> Vec<String> {
        match event_type {
            EventType::Wildcard => self.inner.registry.borrow().types(),
            EventType::Named(name) => vec![name],
        }
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Dispatch `event`.
    ///
    /// Concrete listeners are delivered by the host; wildcard-collection
    /// listeners follow, in registration order, unless the event's type is
    /// muted. The result is the host's: `false` iff the event is cancelable
    /// and a concrete listener prevented its default action.
    ///
    /// Both phases form one dispatch: emitting the same event again from any
    /// listener fails with [`DispatchError::AlreadyDispatching`].
    pub fn emit(&self, event: &E) -> Result<bool, DispatchError> {
        let state = event.state();
        if state.contains(EventFlags::DISPATCHING) {
            return Err(DispatchError::AlreadyDispatching(
                event.event_type().to_owned(),
            ));
        }
        let not_canceled = self.inner.host.dispatch_event(event)?;

        let wildcard = self.inner.registry.borrow().wildcard_callbacks();
        if wildcard.is_empty() {
            return Ok(not_canceled);
        }

        state.insert(EventFlags::DISPATCHING);
        for entry in wildcard {
            if state.contains(EventFlags::STOP_IMMEDIATE_PROPAGATION) {
                break;
            }
            // Skip registrations removed or replaced by an earlier listener.
            let current = self
                .inner
                .registry
                .borrow()
                .wrapped_id(&EventType::Wildcard, entry.id);
            if current != Some(ListenerId::of_callback(&entry.callback)) {
                continue;
            }
            if entry.passive {
                state.insert(EventFlags::IN_PASSIVE_LISTENER);
            }
            (entry.callback)(event);
            state.remove(EventFlags::IN_PASSIVE_LISTENER);
        }
        state.remove(EventFlags::DISPATCHING | EventFlags::STOP_IMMEDIATE_PROPAGATION);

        Ok(not_canceled)
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Snapshot of every concrete type and its listeners.
    pub fn listeners(&self) -> ListenerMap<E> {
        self.inner.registry.borrow().snapshot()
    }

    /// Listeners for `event_type`; the wildcard yields the wildcard
    /// collection.
    pub fn listeners_for(&self, event_type: impl Into<EventType>) -> Vec<Listener<E>> {
        self.inner
            .registry
            .borrow()
            .list_listeners(&event_type.into())
    }

    /// Listeners in the wildcard collection.
    pub fn wildcard_listeners(&self) -> Vec<Listener<E>> {
        self.listeners_for(EventType::Wildcard)
    }

    /// Whether `listener` is registered for `event_type`.
    pub fn has_listener(&self, event_type: impl Into<EventType>, listener: &Listener<E>) -> bool {
        self.inner
            .registry
            .borrow()
            .has_listener(&event_type.into(), listener.id())
    }

    /// Sorted snapshot of the muted types.
    pub fn muted_types(&self) -> Vec<String> {
        self.inner.muted.snapshot()
    }

    /// Whether `event_type` is muted.
    pub fn is_muted(&self, event_type: &str) -> bool {
        self.inner.muted.contains(event_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{events::BasicEvent, testing::CallCounter};

    type Target = TypedEventTarget<BasicEvent>;

    fn emit(target: &Target, event_type: &str) -> bool {
        target
            .emit(&BasicEvent::new(event_type))
            .expect("not re-dispatched")
    }

    #[test]
    fn test_register_and_emit() {
        let target = Target::new();
        let counter = CallCounter::new();
        target.on("x", counter.listener());

        emit(&target, "x");
        emit(&target, "y");
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_null_listener_is_ignored() {
        let target = Target::new();
        target.add_listener("x", None, ListenerOptions::default());
        assert!(target.listeners().is_empty());
        assert!(!target.host().has_listeners("x"));
    }

    #[test]
    fn test_wrapped_callback_reaches_host() {
        let target = Target::new();
        let f = target.on("x", |_: &BasicEvent| {});
        assert_eq!(target.host().listener_count("x"), 1);

        target.off("x", &f);
        assert_eq!(target.host().listener_count("x"), 0);
    }

    #[test]
    fn test_remove_clears_mute_flag() {
        let target = Target::new();
        let f = target.on("a", |_: &BasicEvent| {});
        target.mute("a");
        assert!(target.is_muted("a"));

        target.off("a", &f);
        assert!(!target.is_muted("a"));
        assert!(target.muted_types().is_empty());
    }

    #[test]
    fn test_mute_unknown_type_is_recorded() {
        let target = Target::new();
        target.mute("ghost");
        assert_eq!(target.muted_types(), vec!["ghost".to_string()]);

        let counter = CallCounter::new();
        target.on("ghost", counter.listener());
        emit(&target, "ghost");
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_once_consumed_from_clone() {
        let target = Target::new();
        let counter = CallCounter::new();
        target.once("x", counter.listener());

        let handle = target.clone();
        drop(target);
        emit(&handle, "x");
        emit(&handle, "x");
        assert_eq!(counter.count(), 1);
        assert!(handle.listeners().is_empty());
        assert!(!handle.host().has_listeners("x"));
    }
}
