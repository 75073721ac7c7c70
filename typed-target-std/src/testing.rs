//! Testing utilities.
//!
//! Helpers that make it easy to observe what a target delivers and what it
//! forwards to its host.
//!
//! - [`CallCounter`]: counts invocations of a function-form listener
//! - [`RecordingListener`]: a handler object that records delivered types
//! - [`RecordingHost`]: wraps a delivery primitive and records every call

use crate::basic::BasicEventTarget;
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};
use typed_target_core::{
    AddListenerOptions, DeliveryTarget, DispatchError, Event, EventListener, HostCallback,
    Listener, ListenerId,
};

// ============================================================================
// Call Counter
// ============================================================================

/// Counts how often the listeners it hands out are invoked.
///
/// Every call to [`listener`](CallCounter::listener) builds a new listener
/// identity; all of them share the same count.
///
/// # Example
///
/// ```rust
/// use typed_target_std::{events::BasicEvent, target::TypedEventTarget, testing::CallCounter};
///
/// let target = TypedEventTarget::<BasicEvent>::new();
/// let counter = CallCounter::new();
/// target.on("tick", counter.listener());
///
/// target.emit(&BasicEvent::new("tick")).unwrap();
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    count: Rc<Cell<usize>>,
}

impl CallCounter {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A new function-form listener that bumps this counter.
    pub fn listener<E: 'static>(&self) -> Listener<E> {
        let count = Rc::clone(&self.count);
        Listener::function(move |_: &E| count.set(count.get() + 1))
    }

    /// Number of invocations so far.
    pub fn count(&self) -> usize {
        self.count.get()
    }

    /// Reset to zero.
    pub fn reset(&self) {
        self.count.set(0);
    }
}

// ============================================================================
// Recording Listener
// ============================================================================

/// A handler object that records the type of every event it receives.
///
/// Clones share the record. [`listener`](RecordingListener::listener) always
/// returns the same identity, so it can be registered and removed like any
/// other handler object.
pub struct RecordingListener<E> {
    seen: Rc<RefCell<Vec<String>>>,
    listener: Listener<E>,
}

struct Recorder {
    seen: Rc<RefCell<Vec<String>>>,
}

impl<E: Event> EventListener<E> for Recorder {
    fn handle_event(&self, event: &E) {
        self.seen.borrow_mut().push(event.event_type().to_owned());
    }
}

impl<E: Event> RecordingListener<E> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::new(Recorder {
            seen: Rc::clone(&seen),
        });
        Self {
            seen,
            listener: Listener::from(recorder),
        }
    }

    /// The handler-object listener feeding this recorder.
    pub fn listener(&self) -> Listener<E> {
        self.listener.clone()
    }

    /// Event types received so far, in delivery order.
    pub fn events(&self) -> Vec<String> {
        self.seen.borrow().clone()
    }

    /// Number of events received.
    pub fn count(&self) -> usize {
        self.seen.borrow().len()
    }

    /// Forget everything recorded.
    pub fn clear(&self) {
        self.seen.borrow_mut().clear();
    }
}

impl<E: Event> Default for RecordingListener<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for RecordingListener<E> {
    fn clone(&self) -> Self {
        Self {
            seen: Rc::clone(&self.seen),
            listener: self.listener.clone(),
        }
    }
}

// ============================================================================
// Recording Host
// ============================================================================

/// A call forwarded to a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// `add_event_listener`.
    Add {
        /// Event type.
        event_type: String,
        /// Identity of the wrapped callback.
        callback: ListenerId,
        /// Options as forwarded.
        options: AddListenerOptions,
    },
    /// `remove_event_listener`.
    Remove {
        /// Event type.
        event_type: String,
        /// Identity of the wrapped callback.
        callback: ListenerId,
        /// Capture flag as forwarded.
        capture: bool,
    },
    /// `dispatch_event`.
    Dispatch {
        /// Type of the dispatched event.
        event_type: String,
    },
}

/// A delivery primitive that records every call before forwarding it.
///
/// Clones share both the record and the wrapped primitive.
pub struct RecordingHost<E, T = BasicEventTarget<E>> {
    inner: Rc<T>,
    calls: Rc<RefCell<Vec<HostCall>>>,
    _event: std::marker::PhantomData<fn(&E)>,
}

impl<E, T> RecordingHost<E, T> {
    /// Wrap `inner`.
    pub fn new(inner: T) -> Self {
        Self {
            inner: Rc::new(inner),
            calls: Rc::default(),
            _event: std::marker::PhantomData,
        }
    }

    /// The wrapped primitive.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl<E, T: Default> Default for RecordingHost<E, T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<E, T> Clone for RecordingHost<E, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            calls: Rc::clone(&self.calls),
            _event: std::marker::PhantomData,
        }
    }
}

impl<E, T> std::fmt::Debug for RecordingHost<E, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingHost")
            .field("calls", &self.calls.borrow())
            .finish_non_exhaustive()
    }
}

impl<E: Event, T: DeliveryTarget<E>> DeliveryTarget<E> for RecordingHost<E, T> {
    fn add_event_listener(
        &self,
        event_type: &str,
        callback: &HostCallback<E>,
        options: AddListenerOptions,
    ) {
        self.record(HostCall::Add {
            event_type: event_type.to_owned(),
            callback: ListenerId::of_callback(callback),
            options,
        });
        self.inner.add_event_listener(event_type, callback, options);
    }

    fn remove_event_listener(&self, event_type: &str, callback: &HostCallback<E>, capture: bool) {
        self.record(HostCall::Remove {
            event_type: event_type.to_owned(),
            callback: ListenerId::of_callback(callback),
            capture,
        });
        self.inner
            .remove_event_listener(event_type, callback, capture);
    }

    fn dispatch_event(&self, event: &E) -> Result<bool, DispatchError> {
        self.record(HostCall::Dispatch {
            event_type: event.event_type().to_owned(),
        });
        self.inner.dispatch_event(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::BasicEvent;

    #[test]
    fn test_recording_listener_identity_is_stable() {
        let recorder = RecordingListener::<BasicEvent>::new();
        assert_eq!(recorder.listener(), recorder.clone().listener());

        recorder.listener().call(&BasicEvent::new("a"));
        assert_eq!(recorder.events(), vec!["a".to_string()]);
    }

    #[test]
    fn test_recording_host_forwards() {
        let host = RecordingHost::<BasicEvent>::default();
        let cb: HostCallback<BasicEvent> = Rc::new(|_: &BasicEvent| {});
        host.add_event_listener("a", &cb, AddListenerOptions::default());
        assert_eq!(host.inner().listener_count("a"), 1);

        host.dispatch_event(&BasicEvent::new("a")).unwrap();
        host.remove_event_listener("a", &cb, false);
        assert!(!host.inner().has_listeners("a"));
        assert_eq!(host.calls().len(), 3);
    }
}
