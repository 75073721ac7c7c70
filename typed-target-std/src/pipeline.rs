//! # Callback decorators
//!
//! Every listener is wrapped before it reaches the delivery primitive. The
//! wrapping is a fixed pipeline of small decorators, each an [`Invoke`]:
//!
//! ```text
//! MuteGuard ──▶ OnceGuard ──▶ Direct
//! (outermost)   (optional)    (the resolved listener)
//! ```
//!
//! The mute guard runs first, so a muted delivery never reaches the once
//! guard: a once-listener is only consumed by a delivery that actually
//! invoked it.

use crate::muted::MutedTypes;
use std::{cell::Cell, rc::Rc};
use typed_target_core::{Event, HostCallback, Listener};

/// A step in the decorator pipeline.
pub trait Invoke<E>: 'static {
    /// Run this step for `event`.
    fn invoke(&self, event: &E);
}

/// Innermost step: the listener resolved into a uniform callback.
pub struct Direct<E> {
    callback: HostCallback<E>,
}

impl<E: 'static> Direct<E> {
    /// Resolve `listener` once; dispatch never branches on its shape again.
    pub fn new(listener: &Listener<E>) -> Self {
        Self {
            callback: listener.resolve(),
        }
    }
}

impl<E: 'static> Invoke<E> for Direct<E> {
    fn invoke(&self, event: &E) {
        (self.callback)(event);
    }
}

/// Runs the inner step at most once, then calls its consume hook.
///
/// The consume hook is what unregisters the listener from the registry and
/// the delivery primitive. A re-entrant delivery that arrives while the
/// inner step is still running is dropped.
pub struct OnceGuard<I> {
    inner: I,
    fired: Cell<bool>,
    consume: Box<dyn Fn()>,
}

impl<I> OnceGuard<I> {
    /// Wrap `inner`; `consume` runs right after the first invocation.
    pub fn new(inner: I, consume: impl Fn() + 'static) -> Self {
        Self {
            inner,
            fired: Cell::new(false),
            consume: Box::new(consume),
        }
    }
}

impl<E: 'static, I: Invoke<E>> Invoke<E> for OnceGuard<I> {
    fn invoke(&self, event: &E) {
        if self.fired.replace(true) {
            return;
        }
        self.inner.invoke(event);
        (self.consume)();
    }
}

/// Which event type a [`MuteGuard`] checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MuteScope {
    /// The type the listener was registered under.
    Registered(String),
    /// The type of each delivered event (wildcard listeners).
    Delivered,
}

/// Skips the inner step while the relevant type is muted.
pub struct MuteGuard<I> {
    inner: I,
    scope: MuteScope,
    muted: Rc<MutedTypes>,
}

impl<I> MuteGuard<I> {
    /// Gate `inner` on `muted`.
    pub fn new(inner: I, scope: MuteScope, muted: Rc<MutedTypes>) -> Self {
        Self {
            inner,
            scope,
            muted,
        }
    }
}

impl<E: Event, I: Invoke<E>> Invoke<E> for MuteGuard<I> {
    fn invoke(&self, event: &E) {
        let event_type = match &self.scope {
            MuteScope::Registered(name) => name.as_str(),
            MuteScope::Delivered => event.event_type(),
        };
        if self.muted.contains(event_type) {
            #[cfg(feature = "tracing")]
            tracing::trace!(event_type, "delivery suppressed by mute");
            return;
        }
        self.inner.invoke(event);
    }
}

/// Turn a pipeline into the callback handed to the delivery primitive.
pub fn into_callback<E: 'static, I: Invoke<E>>(pipeline: I) -> HostCallback<E> {
    Rc::new(move |event: &E| pipeline.invoke(event))
}

/// Build the full pipeline for `listener`.
///
/// `consume` is `Some` for once-listeners.
pub fn decorate<E: Event>(
    listener: &Listener<E>,
    scope: MuteScope,
    muted: Rc<MutedTypes>,
    consume: Option<Box<dyn Fn()>>,
) -> HostCallback<E> {
    let direct = Direct::new(listener);
    match consume {
        Some(consume) => into_callback(MuteGuard::new(
            OnceGuard::new(direct, consume),
            scope,
            muted,
        )),
        None => into_callback(MuteGuard::new(direct, scope, muted)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::BasicEvent;

    fn counting(hits: &Rc<Cell<usize>>) -> Listener<BasicEvent> {
        let hits = Rc::clone(hits);
        Listener::function(move |_: &BasicEvent| hits.set(hits.get() + 1))
    }

    #[test]
    fn test_mute_guard_skips_when_muted() {
        let hits = Rc::new(Cell::new(0));
        let muted = Rc::new(MutedTypes::new());
        let callback = decorate(
            &counting(&hits),
            MuteScope::Registered("a".into()),
            Rc::clone(&muted),
            None,
        );
        let event = BasicEvent::new("a");

        callback(&event);
        muted.insert("a");
        callback(&event);
        muted.remove("a");
        callback(&event);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_muted_once_is_not_consumed() {
        let hits = Rc::new(Cell::new(0));
        let consumed = Rc::new(Cell::new(0));
        let muted = Rc::new(MutedTypes::new());
        let c = Rc::clone(&consumed);
        let callback = decorate(
            &counting(&hits),
            MuteScope::Registered("a".into()),
            Rc::clone(&muted),
            Some(Box::new(move || c.set(c.get() + 1))),
        );
        let event = BasicEvent::new("a");

        muted.insert("a");
        callback(&event);
        assert_eq!((hits.get(), consumed.get()), (0, 0));

        muted.remove("a");
        callback(&event);
        callback(&event);
        assert_eq!((hits.get(), consumed.get()), (1, 1));
    }

    #[test]
    fn test_once_guard_drops_reentrant_delivery() {
        let hits = Rc::new(Cell::new(0));
        let slot: Rc<std::cell::RefCell<Option<HostCallback<BasicEvent>>>> = Rc::default();

        let h = Rc::clone(&hits);
        let s = Rc::clone(&slot);
        let listener = Listener::function(move |event: &BasicEvent| {
            h.set(h.get() + 1);
            let again = s.borrow().clone();
            if let Some(again) = again {
                again(event);
            }
        });
        let callback = into_callback(OnceGuard::new(Direct::new(&listener), || {}));
        *slot.borrow_mut() = Some(callback.clone());

        callback(&BasicEvent::new("a"));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_delivered_scope_reads_event_type() {
        let hits = Rc::new(Cell::new(0));
        let muted = Rc::new(MutedTypes::new());
        muted.insert("b");
        let callback = decorate(
            &counting(&hits),
            MuteScope::Delivered,
            Rc::clone(&muted),
            None,
        );

        callback(&BasicEvent::new("a"));
        callback(&BasicEvent::new("b"));
        assert_eq!(hits.get(), 1);
    }
}
